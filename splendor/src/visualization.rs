use crate::{Card, GameState, Gems, RANKS};

fn gems_short(gems: &Gems) -> String {
    let letters = ['W', 'U', 'G', 'R', 'K'];
    let parts: Vec<String> = gems
        .iter()
        .zip(letters)
        .filter(|((_, count), _)| *count > 0)
        .map(|((_, count), letter)| format!("{}{}", letter, count))
        .collect();
    if parts.is_empty() {
        String::from("-")
    } else {
        parts.join(" ")
    }
}

fn card_cell(card: &Card) -> String {
    format!(
        "#{:<2} {}p {:<5} [{}]",
        card.key.0,
        card.points,
        card.provides.to_string(),
        gems_short(&card.cost)
    )
}

/// Renders the board, bank, nobles and players as a multi-line string.
pub fn visualize_state(state: &GameState) -> String {
    let mut result = String::new();
    for rank in RANKS.iter().rev() {
        result += &format!(
            "rank {} ({:>2} left) │",
            *rank as u8,
            state.decks[rank.index()].len()
        );
        for card in state.row(*rank) {
            result += &format!(" {} │", card_cell(card));
        }
        result += "\n";
    }
    result += &format!("bank: {}\n", state.bank);
    result += "nobles:";
    for noble in &state.nobles {
        result += &format!(" [{}]", gems_short(&noble.requires));
    }
    result += "\n";
    for player in &state.players {
        result += &format!(
            "{}: {:>2} pts, bonus [{}], tokens {}",
            player.key,
            player.score,
            gems_short(&player.bonus),
            player.tokens
        );
        if !player.held.is_empty() {
            let held: Vec<String> = player.held.iter().map(card_cell).collect();
            result += &format!(", holding {}", held.join(", "));
        }
        result += "\n";
    }
    result
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{Catalog, GameSettings};

    #[test]
    fn renders_every_row_and_player() {
        let catalog = Catalog::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let state = GameState::new(&catalog, GameSettings::for_players(3).unwrap(), &mut rng);
        let text = visualize_state(&state);
        assert!(text.contains("rank 3"));
        assert!(text.contains("rank 1"));
        assert!(text.contains("player 2"));
        assert_eq!(text.lines().count(), 3 + 2 + 3);
    }
}
