use std::fmt;

/// Unique identifier for any combat-capable entity tracked by the map server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Sentinel for damage that has no attacker (traps whose owner logged out,
    /// terrain damage). Side effects that need an attacker are skipped for it.
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of the map a combatant currently stands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapId(pub u16);

/// Discrete cell position on a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, the range metric used by attack and escape checks.
    pub fn distance(self, other: Position) -> i32 {
        let dx = (self.x as i32 - other.x as i32).abs();
        let dy = (self.y as i32 - other.y as i32).abs();
        dx.max(dy)
    }
}

/// Discrete server time unit driving delayed callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer resource meter (HP or SP) tracked per combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: i32,
    pub maximum: i32,
}

impl ResourceMeter {
    pub fn new(current: i32, maximum: i32) -> Self {
        Self { current, maximum }
    }

    pub fn full(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    /// Removes `amount` down to `floor`, returning the amount actually lost.
    pub fn drain(&mut self, amount: i32, floor: i32) -> i32 {
        let before = self.current;
        self.current = (self.current - amount).max(floor);
        before - self.current
    }

    /// Restores `amount` up to the maximum, returning the amount gained.
    pub fn restore(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = (self.current + amount).min(self.maximum);
        self.current - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_chebyshev() {
        let a = Position::new(10, 10);
        assert_eq!(a.distance(Position::new(13, 11)), 3);
        assert_eq!(a.distance(Position::new(10, 10)), 0);
        assert_eq!(a.distance(Position::new(8, 4)), 6);
    }

    #[test]
    fn drain_respects_floor() {
        let mut hp = ResourceMeter::new(50, 100);
        assert_eq!(hp.drain(80, 0), 50);
        assert_eq!(hp.current, 0);

        let mut hp = ResourceMeter::new(50, 100);
        assert_eq!(hp.drain(80, 1), 49);
        assert_eq!(hp.current, 1);
    }

    #[test]
    fn restore_caps_at_maximum() {
        let mut sp = ResourceMeter::new(90, 100);
        assert_eq!(sp.restore(30), 10);
        assert_eq!(sp.current, 100);
    }
}
