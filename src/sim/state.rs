//! Player state that outlives individual game objects

/// Score holder for one game session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    /// Can go negative (shots and hits cost points)
    pub score: i64,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn award(&mut self, points: i64) {
        self.score += points;
    }

    pub fn charge(&mut self, points: i64) {
        self.score -= points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_goes_negative() {
        let mut player = Player::new();
        player.award(25);
        player.charge(200);
        assert_eq!(player.score, -175);
    }
}
