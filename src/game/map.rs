//! Board geometry: points, hex directions, regions and the territory grid.

use crate::game::PlayerId;

/// A position on the board.
///
/// Components are signed so that stepping off the edge stays representable;
/// use [`Territory::in_bounds`] before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    /// Column (x).
    pub col: i32,
    /// Row (y).
    pub row: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The neighboring point in `direction`, which may be off the board.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.delta(self.col);
        Self::new(self.col + dc, self.row + dr)
    }

    /// Center of this cell in a plane where every neighbor is at distance 1.
    ///
    /// Even columns sit half a cell lower than odd ones.
    #[must_use]
    pub fn center(self) -> (f64, f64) {
        let x = f64::from(self.col) * 3f64.sqrt() / 2.0;
        let shift = if self.col % 2 == 0 { 0.5 } else { 0.0 };
        (x, f64::from(self.row) + shift)
    }
}

/// The six hex directions, in clockwise order starting at `Up`.
///
/// The order matters: [`Direction::index`] is part of the encoding returned
/// by the `opponent` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Straight up.
    Up,
    /// Up and to the right.
    UpRight,
    /// Down and to the right.
    DownRight,
    /// Straight down.
    Down,
    /// Down and to the left.
    DownLeft,
    /// Up and to the left.
    UpLeft,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::UpRight,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::UpLeft,
    ];

    /// Position of this direction in [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse a plan-language direction keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "up" => Some(Self::Up),
            "upright" => Some(Self::UpRight),
            "downright" => Some(Self::DownRight),
            "down" => Some(Self::Down),
            "downleft" => Some(Self::DownLeft),
            "upleft" => Some(Self::UpLeft),
            _ => None,
        }
    }

    /// The plan-language keyword for this direction.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::UpRight => "upright",
            Self::DownRight => "downright",
            Self::Down => "down",
            Self::DownLeft => "downleft",
            Self::UpLeft => "upleft",
        }
    }

    /// `(dcol, drow)` when stepping from a cell in column `col`.
    #[must_use]
    pub const fn delta(self, col: i32) -> (i32, i32) {
        let even = col % 2 == 0;
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::UpRight => (1, if even { 0 } else { -1 }),
            Self::DownRight => (1, if even { 1 } else { 0 }),
            Self::DownLeft => (-1, if even { 1 } else { 0 }),
            Self::UpLeft => (-1, if even { 0 } else { -1 }),
        }
    }
}

/// A single cell of the territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Where this region is.
    pub location: Point,
    /// Current deposit, always within `[0, max_deposit]`.
    deposit: i64,
    /// Upper bound for the deposit.
    max_deposit: i64,
    /// Owner (None = neutral).
    pub owner: Option<PlayerId>,
    /// Whether this region is its owner's city center.
    pub city_center: bool,
}

impl Region {
    /// Create an empty, neutral region.
    #[must_use]
    pub const fn new(location: Point, max_deposit: i64) -> Self {
        Self {
            location,
            deposit: 0,
            max_deposit,
            owner: None,
            city_center: false,
        }
    }

    /// Current deposit.
    #[must_use]
    pub const fn deposit(&self) -> i64 {
        self.deposit
    }

    /// Largest deposit this region can hold.
    #[must_use]
    pub const fn max_deposit(&self) -> i64 {
        self.max_deposit
    }

    /// Add `amount` (possibly negative) to the deposit, clamping to bounds.
    ///
    /// A region whose deposit ends at 0 becomes neutral and stops being a
    /// city center. Returns the owner it lost, if any.
    pub fn update_deposit(&mut self, amount: i64) -> Option<PlayerId> {
        self.deposit = self.deposit.saturating_add(amount).clamp(0, self.max_deposit);
        if self.deposit == 0 {
            self.city_center = false;
            self.owner.take()
        } else {
            None
        }
    }

    /// Make this region the city center of `owner`.
    pub fn make_city_center(&mut self, owner: PlayerId) {
        self.city_center = true;
        self.owner = Some(owner);
    }

    /// Whether `player` owns this region.
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// Whether someone other than `player` owns this region.
    #[must_use]
    pub fn is_opposing(&self, player: PlayerId) -> bool {
        self.owner.is_some_and(|owner| owner != player)
    }
}

/// The fixed-size board, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    rows: i32,
    cols: i32,
    regions: Vec<Region>,
}

impl Territory {
    /// Create a territory of neutral, empty regions.
    ///
    /// Returns `None` if either dimension is not positive.
    #[must_use]
    pub fn new(rows: i32, cols: i32, max_deposit: i64) -> Option<Self> {
        if rows <= 0 || cols <= 0 {
            return None;
        }

        let regions = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Region::new(Point::new(col, row), max_deposit)))
            .collect();

        Some(Self {
            rows,
            cols,
            regions,
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    /// All regions in row-major order.
    #[must_use]
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// All regions in row-major order, mutably.
    #[must_use]
    #[inline]
    pub fn regions_mut(&mut self) -> &mut [Region] {
        &mut self.regions
    }

    /// Whether `point` lies on the board.
    #[must_use]
    pub const fn in_bounds(&self, point: Point) -> bool {
        point.row >= 0 && point.row < self.rows && point.col >= 0 && point.col < self.cols
    }

    /// Index of `point` in [`Territory::regions`].
    #[must_use]
    pub fn index_of(&self, point: Point) -> Option<usize> {
        if !self.in_bounds(point) {
            return None;
        }
        let row = usize::try_from(point.row).ok()?;
        let col = usize::try_from(point.col).ok()?;
        let cols = usize::try_from(self.cols).ok()?;
        Some(row * cols + col)
    }

    /// The region at `point`.
    #[must_use]
    pub fn get(&self, point: Point) -> Option<&Region> {
        self.index_of(point).map(|idx| &self.regions[idx])
    }

    /// The region at `point`, mutably.
    #[must_use]
    pub fn get_mut(&mut self, point: Point) -> Option<&mut Region> {
        self.index_of(point).map(|idx| &mut self.regions[idx])
    }

    /// On-board neighbors of `point`, in direction order.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| point.step(direction))
            .filter(|p| self.in_bounds(*p))
    }

    /// Regions owned by `player`.
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |r| r.is_owned_by(player))
    }

    /// The city center `player` still owns, if any.
    #[must_use]
    pub fn city_center_of(&self, player: PlayerId) -> Option<Point> {
        self.owned_by(player)
            .find(|r| r.city_center)
            .map(|r| r.location)
    }

    /// Sum of deposits owned by `player`.
    #[must_use]
    pub fn total_deposit(&self, player: PlayerId) -> i64 {
        self.owned_by(player).map(Region::deposit).sum()
    }
}
