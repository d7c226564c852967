//! Game state management and the rules of a turn.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{GameError, GameResult};
use crate::game::{
    shortest_distance, Direction, Player, PlayerId, Point, Region, Territory, MIN_PLAYERS,
};
use crate::plan::{self, Actions, Environment, Flow, Plan};

/// Flat fee charged by every action.
pub const ACTION_COST: i64 = 1;

/// Relocation cost per step between the crew and the current city center.
const RELOCATE_COST_PER_STEP: i64 = 5;
/// Fixed part of the relocation cost.
const RELOCATE_BASE_COST: i64 = 10;

/// `random` evaluates to a value in `[0, RANDOM_BOUND)`.
const RANDOM_BOUND: i64 = 1000;

/// Names the engine resolves when the acting player has not bound them.
pub const SPECIAL_IDENTIFIERS: [&str; 9] = [
    "rows",
    "cols",
    "currow",
    "curcol",
    "budget",
    "deposit",
    "int",
    "maxdeposit",
    "random",
];

/// Complete game state.
///
/// Players take turns in id order. During a turn the acting player's city
/// crew starts at their city center and every action is relative to it.
#[derive(Debug, Clone)]
pub struct GameState {
    config: Config,
    territory: Territory,
    players: Vec<Player>,
    /// Index into `players` of the acting player.
    current: usize,
    /// Crew location for the running turn.
    crew: Point,
    /// Round counter, starting at 1.
    turn: i64,
    winner: Option<PlayerId>,
    /// Set once a winner is decided or nobody is left.
    ended: bool,
    rng: ChaCha8Rng,
}

impl GameState {
    /// Create a game from a prepared territory.
    ///
    /// Every player must already own a city center on `territory`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Setup`] with fewer than two players or when a
    /// player has no city center.
    pub fn new(
        config: Config,
        territory: Territory,
        players: Vec<Player>,
        rng: ChaCha8Rng,
    ) -> GameResult<Self> {
        if players.len() < MIN_PLAYERS {
            return Err(GameError::Setup(format!(
                "need at least {MIN_PLAYERS} players, got {}",
                players.len()
            )));
        }
        let mut crew = None;
        for player in &players {
            let Some(center) = territory.city_center_of(player.id) else {
                return Err(GameError::Setup(format!(
                    "player {} has no city center",
                    player.id
                )));
            };
            crew.get_or_insert(center);
        }
        let crew = crew.unwrap_or(Point::new(0, 0));

        Ok(Self {
            config,
            territory,
            players,
            current: 0,
            crew,
            turn: 1,
            winner: None,
            ended: false,
            rng,
        })
    }

    /// The configuration this game was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The board.
    #[must_use]
    pub const fn territory(&self) -> &Territory {
        &self.territory
    }

    /// The board, mutably. Meant for scenario setup.
    #[must_use]
    pub fn territory_mut(&mut self) -> &mut Territory {
        &mut self.territory
    }

    /// Current round, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> i64 {
        self.turn
    }

    /// The winner, once decided. Never changes afterwards.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Whether no more plans will be accepted.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.ended
    }

    /// All players in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Get a mutable reference to a player by ID.
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current]
    }

    /// Where the city crew is.
    #[must_use]
    pub const fn crew(&self) -> Point {
        self.crew
    }

    /// Put the crew on `point` directly. Returns `false` if off the board.
    pub fn place_crew(&mut self, point: Point) -> bool {
        if !self.territory.in_bounds(point) {
            return false;
        }
        self.crew = point;
        true
    }

    /// The acting player's identifier table.
    #[must_use]
    pub fn identifiers(&self) -> &HashMap<String, i64> {
        self.current_player().identifiers()
    }

    /// Value of a special identifier for the acting player, or `None` if
    /// `name` is not one.
    ///
    /// Reading `random` advances the game's RNG.
    pub fn special_identifier(&mut self, name: &str) -> Option<i64> {
        let deposit = self.territory.get(self.crew).map_or(0, Region::deposit);
        let value = match name {
            "rows" => i64::from(self.territory.rows()),
            "cols" => i64::from(self.territory.cols()),
            "currow" => i64::from(self.crew.row),
            "curcol" => i64::from(self.crew.col),
            "budget" => self.current_player().budget(),
            "deposit" => deposit,
            #[allow(clippy::cast_possible_truncation)]
            "int" => self.config.interest_rate(self.turn, deposit) as i64,
            "maxdeposit" => self.config.max_dep,
            "random" => self.rng.gen_range(0..RANDOM_BOUND),
            _ => return None,
        };
        Some(value)
    }

    /// Every special identifier and its current value.
    pub fn special_identifiers(&mut self) -> BTreeMap<&'static str, i64> {
        SPECIAL_IDENTIFIERS
            .into_iter()
            .filter_map(|name| self.special_identifier(name).map(|v| (name, v)))
            .collect()
    }

    /// Parse and run one plan for the acting player, then pass the turn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameEnded`] once the game is over, or the
    /// syntax error of a malformed plan. In both cases nothing changes.
    pub fn submit_plan(&mut self, src: &str) -> GameResult<Flow> {
        if self.ended {
            return Err(GameError::GameEnded);
        }
        let plan = plan::parse(src)?;
        self.play_turn(&plan)
    }

    /// Run an already parsed plan for the acting player, then pass the
    /// turn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameEnded`] once the game is over.
    pub fn play_turn(&mut self, plan: &Plan) -> GameResult<Flow> {
        if self.ended {
            return Err(GameError::GameEnded);
        }
        let flow = if self.begin_turn() {
            plan::run(plan, self)
        } else {
            Flow::Halt
        };
        self.end_turn();
        Ok(flow)
    }

    /// Put the crew on the acting player's city center.
    ///
    /// Returns `false` if the player has none left.
    pub fn begin_turn(&mut self) -> bool {
        let id = self.current_player().id;
        debug!(player = id, turn = self.turn, "turn started");
        match self.territory.city_center_of(id) {
            Some(center) => {
                self.crew = center;
                true
            }
            None => false,
        }
    }

    /// Eliminate players, decide the winner and pass control on.
    ///
    /// When control returns to the first player the round is over:
    /// interest is paid and the turn counter advances.
    pub fn end_turn(&mut self) {
        if self.ended {
            return;
        }

        for player in self.players.iter_mut().filter(|p| p.alive) {
            if player.budget() == 0 || self.territory.city_center_of(player.id).is_none() {
                player.eliminate();
                info!(player = player.id, turn = self.turn, "player eliminated");
            }
        }

        let mut alive = self.players.iter().filter(|p| p.alive);
        match (alive.next(), alive.next()) {
            (Some(last), None) => {
                self.winner = Some(last.id);
                self.ended = true;
                info!(winner = last.id, turn = self.turn, "game won");
                return;
            }
            (None, _) => {
                self.ended = true;
                info!(turn = self.turn, "all players eliminated, game drawn");
                return;
            }
            _ => {}
        }

        let count = self.players.len();
        let mut next = self.current;
        loop {
            next = (next + 1) % count;
            if next == 0 {
                self.apply_interest();
                self.turn += 1;
                info!(turn = self.turn, "round started");
            }
            if self.players[next].alive {
                break;
            }
        }
        self.current = next;
    }

    /// Interest rate in percent for `deposit` at the current turn.
    #[must_use]
    pub fn interest_rate(&self, deposit: i64) -> f64 {
        self.config.interest_rate(self.turn, deposit)
    }

    /// Pay interest on every owned region.
    fn apply_interest(&mut self) {
        let turn = self.turn;
        for region in self.territory.regions_mut() {
            if region.owner.is_none() {
                continue;
            }
            let deposit = region.deposit();
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let interest = (deposit as f64 * self.config.interest_rate(turn, deposit) / 100.0) as i64;
            region.update_deposit(interest);
        }
    }

    /// Move the crew one region in `direction`.
    ///
    /// Fails only when the fee cannot be paid. Moving off the board or onto
    /// an opponent's region costs the fee and leaves the crew in place.
    pub fn move_crew(&mut self, direction: Direction) -> bool {
        if self.ended || !self.current_player().can_afford(ACTION_COST) {
            return false;
        }
        let actor = self.current_player().id;
        self.current_player_mut().update_budget(-ACTION_COST);

        let target = self.crew.step(direction);
        let passable = self
            .territory
            .get(target)
            .is_some_and(|r| !r.is_opposing(actor));
        if passable {
            self.crew = target;
        }
        debug!(player = actor, ?direction, moved = passable, crew = ?self.crew, "move");
        true
    }

    /// Invest `amount` into the crew's region and take ownership of it.
    ///
    /// The fee is always charged. The investment needs a positive amount
    /// the player can afford, on a region that is owned by the player or
    /// borders one. Never halts the plan.
    pub fn invest(&mut self, amount: i64) -> bool {
        if self.ended {
            return false;
        }
        let actor = self.current_player().id;
        self.current_player_mut().update_budget(-ACTION_COST);

        let crew = self.crew;
        let connected = self.territory.get(crew).is_some_and(|r| r.is_owned_by(actor))
            || self
                .territory
                .neighbors(crew)
                .any(|p| self.territory.get(p).is_some_and(|r| r.is_owned_by(actor)));
        if amount <= 0 || !connected || !self.current_player().can_afford(amount) {
            debug!(player = actor, amount, connected, "invest skipped");
            return true;
        }

        self.current_player_mut().update_budget(-amount);
        if let Some(region) = self.territory.get_mut(crew) {
            region.owner = Some(actor);
            region.update_deposit(amount);
        }
        debug!(player = actor, amount, at = ?crew, "invest");
        true
    }

    /// Move `amount` from the crew's region into the budget.
    ///
    /// Halts the plan if the fee cannot be paid or `amount` is negative.
    /// Asking for more than the deposit holds only costs the fee.
    pub fn collect(&mut self, amount: i64) -> bool {
        if self.ended || amount < 0 || !self.current_player().can_afford(ACTION_COST) {
            return false;
        }
        let actor = self.current_player().id;
        self.current_player_mut().update_budget(-ACTION_COST);

        let Some(region) = self.territory.get_mut(self.crew) else {
            return true;
        };
        if amount > region.deposit() {
            debug!(player = actor, amount, deposit = region.deposit(), "collect exceeds deposit");
            return true;
        }
        region.update_deposit(-amount);
        self.players[self.current].update_budget(amount);
        debug!(player = actor, amount, "collect");
        true
    }

    /// Make the crew's region the city center.
    ///
    /// Costs 5 per step of the shortest path to the current center plus 10,
    /// on top of the fee. Only halts when the fee cannot be paid.
    pub fn relocate(&mut self) -> bool {
        if self.ended || !self.current_player().can_afford(ACTION_COST) {
            return false;
        }
        let actor = self.current_player().id;
        self.current_player_mut().update_budget(-ACTION_COST);

        let crew = self.crew;
        if !self.territory.get(crew).is_some_and(|r| r.is_owned_by(actor)) {
            debug!(player = actor, at = ?crew, "relocate onto foreign region");
            return true;
        }
        let Some(center) = self.territory.city_center_of(actor) else {
            return true;
        };
        if center == crew {
            return true;
        }
        let Some(distance) = shortest_distance(&self.territory, crew, center) else {
            return true;
        };
        let cost = RELOCATE_COST_PER_STEP * i64::from(distance) + RELOCATE_BASE_COST;
        if !self.current_player().can_afford(cost) {
            debug!(player = actor, cost, "relocate unaffordable");
            return true;
        }

        self.current_player_mut().update_budget(-cost);
        if let Some(old) = self.territory.get_mut(center) {
            old.city_center = false;
        }
        if let Some(new) = self.territory.get_mut(crew) {
            new.make_city_center(actor);
        }
        info!(player = actor, from = ?center, to = ?crew, cost, "city center relocated");
        true
    }

    /// Spend `expenditure` to drain the deposit of the region next to the
    /// crew in `direction`.
    ///
    /// Halts the plan, after charging the fee, if `expenditure` is negative
    /// or not affordable on top of the fee. Emptying an opponent's city
    /// center wins the game on the spot.
    pub fn attack(&mut self, direction: Direction, expenditure: i64) -> bool {
        if self.ended {
            return false;
        }
        let actor = self.current_player().id;
        if expenditure < 0
            || !self
                .current_player()
                .can_afford(expenditure.saturating_add(ACTION_COST))
        {
            self.current_player_mut().update_budget(-ACTION_COST);
            debug!(player = actor, expenditure, "attack refused");
            return false;
        }
        self.current_player_mut()
            .update_budget(-(expenditure + ACTION_COST));

        let target = self.crew.step(direction);
        let Some(region) = self.territory.get_mut(target) else {
            debug!(player = actor, ?direction, "attack off the board");
            return true;
        };
        let enemy_center = region.city_center && region.is_opposing(actor);
        let lost = region.update_deposit(-expenditure);
        debug!(player = actor, at = ?target, expenditure, remaining = region.deposit(), "attack");

        if enemy_center && let Some(loser) = lost {
            self.capture(actor, loser);
        }
        true
    }

    /// `actor` took `loser`'s city center.
    fn capture(&mut self, actor: PlayerId, loser: PlayerId) {
        if let Some(player) = self.player_mut(loser) {
            player.eliminate();
        }
        self.winner = Some(actor);
        self.ended = true;
        info!(winner = actor, loser, turn = self.turn, "city center captured");
    }

    /// Encoded distance and deposit size of the first opponent region seen
    /// from the crew in `direction`.
    ///
    /// The result is `100 * (d + 1) + digits(deposit + 1)` where `d` is the
    /// number of regions in between, or 0 if the line of sight leaves the
    /// board first.
    #[must_use]
    pub fn nearby(&self, direction: Direction) -> i64 {
        let actor = self.current_player().id;
        let mut point = self.crew.step(direction);
        let mut distance = 0_i64;
        while let Some(region) = self.territory.get(point) {
            if region.is_opposing(actor) {
                let digits = i64::from(region.deposit().saturating_add(1).ilog10()) + 1;
                return (distance + 1) * 100 + digits;
            }
            distance += 1;
            point = point.step(direction);
        }
        0
    }

    /// Encoded direction and distance of the closest opponent region.
    ///
    /// The six straight lines from the crew are scanned ring by ring, in
    /// direction order. The result is `10 * ring + direction index + 1`,
    /// or 0 if every line leaves the board first.
    #[must_use]
    pub fn opponent(&self) -> i64 {
        let actor = self.current_player().id;
        let mut rays = [Some(self.crew); 6];
        let mut ring = 0_i64;
        loop {
            ring += 1;
            let mut extended = false;
            for ((code, direction), ray) in (1_i64..).zip(Direction::ALL).zip(rays.iter_mut()) {
                let Some(from) = *ray else {
                    continue;
                };
                let next = from.step(direction);
                match self.territory.get(next) {
                    Some(region) if region.is_opposing(actor) => return ring * 10 + code,
                    Some(_) => {
                        *ray = Some(next);
                        extended = true;
                    }
                    None => *ray = None,
                }
            }
            if !extended {
                return 0;
            }
        }
    }
}

impl Environment for GameState {
    fn lookup(&mut self, name: &str) -> i64 {
        if let Some(value) = self.current_player().identifier(name) {
            return value;
        }
        self.special_identifier(name).unwrap_or(0)
    }

    fn opponent(&mut self) -> i64 {
        Self::opponent(self)
    }

    fn nearby(&mut self, direction: Direction) -> i64 {
        Self::nearby(self, direction)
    }
}

impl Actions for GameState {
    fn assign(&mut self, name: &str, value: i64) {
        self.current_player_mut().assign(name, value);
    }

    fn move_crew(&mut self, direction: Direction) -> bool {
        Self::move_crew(self, direction)
    }

    fn invest(&mut self, amount: i64) -> bool {
        Self::invest(self, amount)
    }

    fn collect(&mut self, amount: i64) -> bool {
        Self::collect(self, amount)
    }

    fn relocate(&mut self) -> bool {
        Self::relocate(self)
    }

    fn attack(&mut self, direction: Direction, expenditure: i64) -> bool {
        Self::attack(self, direction, expenditure)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    /// 4x4 board, player 1 centered at (0,1), player 2 at (3,1).
    fn create_test_game(budget: i64) -> GameState {
        let config = Config {
            rows: 4,
            cols: 4,
            init_budget: budget,
            interest_pct: 5,
            ..Config::default()
        };
        let mut territory = Territory::new(4, 4, config.max_dep).unwrap();
        for (id, at) in [(1, Point::new(0, 1)), (2, Point::new(3, 1))] {
            let region = territory.get_mut(at).unwrap();
            region.make_city_center(id);
            region.update_deposit(config.init_center_dep);
        }
        let players = vec![Player::new(1, "p1", budget), Player::new(2, "p2", budget)];
        let mut game =
            GameState::new(config, territory, players, ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert!(game.begin_turn());
        game
    }

    fn budget(game: &GameState) -> i64 {
        game.current_player().budget()
    }

    fn deposit_at(game: &GameState, col: i32, row: i32) -> i64 {
        game.territory().get(Point::new(col, row)).unwrap().deposit()
    }

    #[test]
    fn test_game_state_creation() {
        let game = create_test_game(1000);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.winner(), None);
        assert!(!game.is_over());
        assert_eq!(game.current_player().id, 1);
        assert_eq!(game.crew(), Point::new(0, 1));
    }

    #[test]
    fn test_creation_needs_city_centers() {
        let territory = Territory::new(4, 4, 100).unwrap();
        let players = vec![Player::new(1, "a", 10), Player::new(2, "b", 10)];
        let result = GameState::new(
            Config::default(),
            territory,
            players,
            ChaCha8Rng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(GameError::Setup(_))));
    }

    #[test]
    fn test_move() {
        let mut game = create_test_game(1000);
        assert!(game.move_crew(Direction::Up));
        assert_eq!(game.crew(), Point::new(0, 0));
        assert!(game.move_crew(Direction::UpRight));
        assert_eq!(game.crew(), Point::new(1, 0));
        assert!(game.move_crew(Direction::DownRight));
        assert_eq!(game.crew(), Point::new(2, 0));
        assert!(game.move_crew(Direction::Down));
        assert_eq!(game.crew(), Point::new(2, 1));
        assert_eq!(budget(&game), 996);
    }

    #[test]
    fn test_move_off_board_or_into_opponent_stays() {
        let mut game = create_test_game(1000);
        game.place_crew(Point::new(0, 0));
        assert!(game.move_crew(Direction::Up));
        assert_eq!(game.crew(), Point::new(0, 0));

        game.place_crew(Point::new(2, 1));
        assert!(game.move_crew(Direction::UpRight));
        assert_eq!(game.crew(), Point::new(2, 1));
        assert_eq!(budget(&game), 998);
    }

    #[test]
    fn test_move_without_budget_halts() {
        let mut game = create_test_game(0);
        assert!(!game.move_crew(Direction::Up));
        assert_eq!(game.crew(), Point::new(0, 1));
        assert_eq!(budget(&game), 0);
    }

    #[test]
    fn test_invest() {
        let mut game = create_test_game(1000);
        game.place_crew(Point::new(1, 1));
        assert!(game.invest(11));
        assert_eq!(budget(&game), 988);
        assert_eq!(deposit_at(&game, 1, 1), 11);
        assert!(game.territory().get(Point::new(1, 1)).unwrap().is_owned_by(1));
    }

    #[test]
    fn test_invest_needs_adjacent_ownership() {
        let mut game = create_test_game(1000);
        game.place_crew(Point::new(2, 3));
        assert!(game.invest(50));
        assert_eq!(budget(&game), 999);
        assert_eq!(deposit_at(&game, 2, 3), 0);
    }

    #[test]
    fn test_invest_unaffordable_charges_fee_only() {
        let mut game = create_test_game(100);
        assert!(game.invest(100));
        assert_eq!(budget(&game), 99);
        assert_eq!(deposit_at(&game, 0, 1), 100);
    }

    #[test]
    fn test_collect() {
        let mut game = create_test_game(1000);
        assert!(game.collect(101));
        assert_eq!(budget(&game), 999);
        assert_eq!(deposit_at(&game, 0, 1), 100);

        assert!(game.collect(40));
        assert_eq!(budget(&game), 1038);
        assert_eq!(deposit_at(&game, 0, 1), 60);

        assert!(!game.collect(-1));
        assert_eq!(budget(&game), 1038);
    }

    #[test]
    fn test_collect_everything_loses_region() {
        let mut game = create_test_game(1000);
        assert!(game.collect(100));
        let region = game.territory().get(Point::new(0, 1)).unwrap();
        assert_eq!(region.deposit(), 0);
        assert_eq!(region.owner, None);
        assert!(!region.city_center);
    }

    #[test]
    fn test_attack() {
        let mut game = create_test_game(1000);
        game.place_crew(Point::new(2, 1));
        game.territory_mut()
            .get_mut(Point::new(3, 1))
            .unwrap()
            .update_deposit(9900);

        assert!(game.attack(Direction::UpRight, 100));
        assert_eq!(budget(&game), 899);
        assert_eq!(deposit_at(&game, 3, 1), 9900);

        assert!(!game.attack(Direction::UpRight, 10_000));
        assert_eq!(budget(&game), 898);

        assert!(!game.attack(Direction::UpRight, -5));
        assert_eq!(budget(&game), 897);

        assert!(game.attack(Direction::UpRight, 896));
        assert_eq!(budget(&game), 0);
        assert_eq!(deposit_at(&game, 3, 1), 9004);
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_attack_without_budget() {
        let mut game = create_test_game(0);
        assert!(!game.attack(Direction::Up, 0));
        assert_eq!(budget(&game), 0);
    }

    #[test]
    fn test_attack_captures_city_center() {
        let mut game = create_test_game(1000);
        game.place_crew(Point::new(2, 1));
        assert!(game.attack(Direction::UpRight, 100));
        assert_eq!(game.winner(), Some(1));
        assert!(game.is_over());
        assert!(!game.player(2).unwrap().alive);
        assert!(!game.move_crew(Direction::Up));
        assert_eq!(game.submit_plan("done"), Err(GameError::GameEnded));
    }

    #[test]
    fn test_relocate() {
        let mut game = create_test_game(1000);
        // (2,2) borders nothing player 1 owns yet.
        game.place_crew(Point::new(2, 2));
        assert!(game.invest(10));
        assert_eq!(budget(&game), 999);
        assert_eq!(deposit_at(&game, 2, 2), 0);

        game.place_crew(Point::new(1, 1));
        assert!(game.invest(10));
        game.place_crew(Point::new(2, 1));
        assert!(game.invest(10));
        assert_eq!(budget(&game), 977);

        assert!(game.relocate());
        // Two steps from (0,1): 1 + 5 * 2 + 10.
        assert_eq!(budget(&game), 956);
        assert_eq!(game.territory().city_center_of(1), Some(Point::new(2, 1)));
        assert!(!game.territory().get(Point::new(0, 1)).unwrap().city_center);
        assert!(game.territory().get(Point::new(0, 1)).unwrap().is_owned_by(1));
    }

    #[test]
    fn test_relocate_on_foreign_region() {
        let mut game = create_test_game(1000);
        game.place_crew(Point::new(2, 2));
        assert!(game.relocate());
        assert_eq!(budget(&game), 999);
        assert_eq!(game.territory().city_center_of(1), Some(Point::new(0, 1)));

        let mut broke = create_test_game(0);
        assert!(!broke.relocate());
    }

    #[test]
    fn test_relocate_unaffordable_on_own_region() {
        let mut game = create_test_game(1000);
        game.place_crew(Point::new(1, 1));
        assert!(game.invest(10));
        game.place_crew(Point::new(2, 1));
        assert!(game.invest(10));

        // Fee paid, 19 left against a cost of 20: nothing moves.
        game.player_mut(1).unwrap().set_budget(20);
        assert!(game.relocate());
        assert_eq!(budget(&game), 19);
        assert_eq!(game.territory().city_center_of(1), Some(Point::new(0, 1)));
        assert!(!game.territory().get(Point::new(2, 1)).unwrap().city_center);

        // One more coin covers it exactly.
        game.player_mut(1).unwrap().set_budget(21);
        assert!(game.relocate());
        assert_eq!(budget(&game), 0);
        assert_eq!(game.territory().city_center_of(1), Some(Point::new(2, 1)));
    }

    #[test]
    fn test_opponent() {
        let mut game = create_test_game(1000);
        assert_eq!(game.opponent(), 0);
        for (at, expected) in [
            (Point::new(3, 2), 11),
            (Point::new(3, 0), 14),
            (Point::new(2, 0), 13),
            (Point::new(1, 0), 23),
            (Point::new(2, 1), 12),
            (Point::new(1, 2), 22),
        ] {
            game.place_crew(at);
            assert_eq!(game.opponent(), expected, "from {at:?}");
        }
    }

    #[test]
    fn test_nearby() {
        let mut game = create_test_game(1000);
        game.place_crew(Point::new(0, 0));
        assert_eq!(game.nearby(Direction::DownRight), 0);

        let target = game.territory_mut().get_mut(Point::new(3, 2)).unwrap();
        target.owner = Some(2);
        assert_eq!(game.nearby(Direction::DownRight), 301);

        game.territory_mut()
            .get_mut(Point::new(3, 2))
            .unwrap()
            .update_deposit(100);
        assert_eq!(game.nearby(Direction::DownRight), 303);
        assert_eq!(game.nearby(Direction::Down), 0);
    }

    #[test]
    fn test_special_identifiers() {
        let mut game = create_test_game(1000);
        let specials = game.special_identifiers();
        assert_eq!(specials["rows"], 4);
        assert_eq!(specials["cols"], 4);
        assert_eq!(specials["currow"], 1);
        assert_eq!(specials["curcol"], 0);
        assert_eq!(specials["budget"], 1000);
        assert_eq!(specials["deposit"], 100);
        assert_eq!(specials["int"], 0);
        assert_eq!(specials["maxdeposit"], 1_000_000);
        assert!((0..1000).contains(&specials["random"]));
        assert_eq!(game.special_identifier("x"), None);
    }

    #[test]
    fn test_lookup_prefers_player_table() {
        let mut game = create_test_game(1000);
        assert_eq!(game.lookup("budget"), 1000);
        game.assign("budget", 5);
        assert_eq!(game.lookup("budget"), 5);
        assert_eq!(game.lookup("unbound"), 0);
    }

    #[test]
    fn test_turn_alternation_and_interest() {
        let mut game = create_test_game(1000);
        game.territory_mut()
            .get_mut(Point::new(0, 1))
            .unwrap()
            .update_deposit(900);

        game.submit_plan("x = 1").unwrap();
        assert_eq!(game.current_player().id, 2);
        assert_eq!(game.turn(), 1);
        game.submit_plan("x = 2").unwrap();
        assert_eq!(game.current_player().id, 1);
        assert_eq!(game.turn(), 2);
        // ln(1) = 0: no interest after the first round.
        assert_eq!(deposit_at(&game, 0, 1), 1000);

        game.submit_plan("x = 1").unwrap();
        game.submit_plan("x = 2").unwrap();
        assert_eq!(game.turn(), 3);
        // 1000 * 5 * 3 * ln 2 / 100
        assert_eq!(deposit_at(&game, 0, 1), 1103);
        assert_eq!(game.player(1).unwrap().identifier("x"), Some(1));
        assert_eq!(game.player(2).unwrap().identifier("x"), Some(2));
    }

    #[test]
    fn test_syntax_error_leaves_state() {
        let mut game = create_test_game(1000);
        let before = game.territory().clone();
        let err = game.submit_plan("move up\nmove sideways").unwrap_err();
        assert!(matches!(err, GameError::Syntax(_)));
        assert_eq!(game.territory(), &before);
        assert_eq!(game.current_player().id, 1);
        assert_eq!(budget(&game), 1000);
    }

    #[test]
    fn test_defeated_by_out_of_budget() {
        let mut game = create_test_game(1);
        game.submit_plan("move up").unwrap();
        assert_eq!(game.player(1).unwrap().budget(), 0);
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(2));
        assert_eq!(game.submit_plan("done"), Err(GameError::GameEnded));
    }

    #[test]
    fn test_defeated_by_no_city_center() {
        let mut game = create_test_game(1000);
        game.submit_plan("collect 100").unwrap();
        assert_eq!(game.winner(), Some(2));
        assert_eq!(game.submit_plan("done"), Err(GameError::GameEnded));
    }

    #[test]
    fn test_plan_halts_at_failed_action() {
        let mut game = create_test_game(2);
        let flow = game.submit_plan("move up move up move up x = 1").unwrap();
        assert_eq!(flow, Flow::Halt);
        assert_eq!(game.player(1).unwrap().identifier("x"), None);
    }
}
