use quickcheck::{Arbitrary, Gen};

use crate::{Gems, Player, PlayerKey, Tokens, COLORS};

/// Small counts, so that sums of a few values stay far from `u8::MAX`.
fn small_count(g: &mut Gen) -> u8 {
    u8::arbitrary(g) % 8
}

impl Arbitrary for Gems {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut gems = Gems::new();
        for color in COLORS {
            gems[color] = small_count(g);
        }
        gems
    }
}

impl Arbitrary for Tokens {
    fn arbitrary(g: &mut Gen) -> Self {
        Tokens {
            gems: Gems::arbitrary(g),
            gold: small_count(g) % 6,
        }
    }
}

impl Arbitrary for Player {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut player = Player::new(PlayerKey(0));
        player.bonus = Gems::arbitrary(g);
        player.tokens = Tokens::arbitrary(g);
        player.score = u8::arbitrary(g) % 20;
        player
    }
}
