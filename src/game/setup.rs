//! Deterministic game setup.
//!
//! A game is fully determined by its configuration, the number of players
//! and a seed: the same seed places the same city centers and drives the
//! same `random` values.

use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::Config;
use crate::error::{GameError, GameResult};
use crate::game::{GameState, Player, PlayerId, Point, Territory};

/// Minimum number of players in a game.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a game.
pub const MAX_PLAYERS: usize = 8;

/// Pick one distinct random region per player.
///
/// # Errors
///
/// Returns [`GameError::Setup`] if the board has fewer regions than
/// players.
pub fn place_city_centers<R: Rng + ?Sized>(
    territory: &Territory,
    num_players: usize,
    rng: &mut R,
) -> GameResult<Vec<Point>> {
    let regions = territory.regions();
    if regions.len() < num_players {
        return Err(GameError::Setup(format!(
            "not enough regions for {num_players} players: {}",
            regions.len()
        )));
    }
    Ok(sample(rng, regions.len(), num_players)
        .into_iter()
        .map(|idx| regions[idx].location)
        .collect())
}

/// Create a game for `names.len()` players with randomly placed city
/// centers.
///
/// Players get ids `1..=n` in the order of `names`, the configured starting
/// budget, and a city center holding the configured starting deposit.
///
/// # Errors
///
/// Returns [`GameError::Setup`] for a player count outside
/// [`MIN_PLAYERS`]`..=`[`MAX_PLAYERS`] or a
/// board too small to place everyone.
pub fn new_game(config: Config, names: &[String], seed: u64) -> GameResult<GameState> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
        return Err(GameError::Setup(format!(
            "need {MIN_PLAYERS} to {MAX_PLAYERS} players, got {}",
            names.len()
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut territory = Territory::new(config.rows, config.cols, config.max_dep)
        .ok_or_else(|| GameError::Setup("invalid board dimensions".to_string()))?;
    let centers = place_city_centers(&territory, names.len(), &mut rng)?;

    let mut players = Vec::with_capacity(names.len());
    for ((id, name), &center) in (1..).zip(names).zip(&centers) {
        let id: PlayerId = id;
        if let Some(region) = territory.get_mut(center) {
            region.make_city_center(id);
            region.update_deposit(config.init_center_dep);
        }
        debug!(player = id, %name, ?center, "city center placed");
        players.push(Player::new(id, name.as_str(), config.init_budget));
    }

    GameState::new(config, territory, players, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("p{i}")).collect()
    }

    #[test]
    fn test_setup_determinism() {
        let a = new_game(Config::default(), &names(2), 42).unwrap();
        let b = new_game(Config::default(), &names(2), 42).unwrap();
        assert_eq!(a.territory(), b.territory());
    }

    #[test]
    fn test_city_centers_distinct() {
        let config = Config {
            rows: 2,
            cols: 2,
            ..Config::default()
        };
        for seed in 0..20 {
            let game = new_game(config, &names(4), seed).unwrap();
            let centers: Vec<_> = (1..=4)
                .map(|id| game.territory().city_center_of(id).unwrap())
                .collect();
            for (i, a) in centers.iter().enumerate() {
                assert!(!centers[i + 1..].contains(a), "seed {seed}: {centers:?}");
            }
        }
    }

    #[test]
    fn test_initial_resources() {
        let config = Config {
            init_budget: 777,
            init_center_dep: 55,
            ..Config::default()
        };
        let game = new_game(config, &names(2), 3).unwrap();
        for player in game.players() {
            assert_eq!(player.budget(), 777);
            let center = game.territory().city_center_of(player.id).unwrap();
            assert_eq!(game.territory().get(center).unwrap().deposit(), 55);
        }
        assert_eq!(game.current_player().id, 1);
    }

    #[test]
    fn test_board_too_small() {
        let config = Config {
            rows: 1,
            cols: 1,
            ..Config::default()
        };
        assert!(matches!(
            new_game(config, &names(2), 0),
            Err(GameError::Setup(_))
        ));
    }

    #[test]
    fn test_player_count() {
        assert!(new_game(Config::default(), &names(MIN_PLAYERS - 1), 0).is_err());
        assert!(new_game(Config::default(), &names(MAX_PLAYERS + 1), 0).is_err());
        assert!(new_game(Config::default(), &names(MIN_PLAYERS), 0).is_ok());
        assert!(new_game(Config::default(), &names(MAX_PLAYERS), 0).is_ok());
    }
}
