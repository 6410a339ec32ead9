use crate::{distance_between, Card, PlayerId, Snapshot, BOARD_LENGTH};

/// Draws the piste with a ruler above it, e.g.
///
/// ```text
///  0    5    10   15   20
/// ╭───────────────────────╮
/// │1·········2············│
/// ╰───────────────────────╯
/// ```
pub fn visualize_piste(positions: [u8; 2]) -> String {
    let width = usize::from(BOARD_LENGTH);
    let mut ruler = vec![' '; width + 2];
    for mark in (0..width).step_by(5) {
        for (offset, digit) in mark.to_string().chars().enumerate() {
            if let Some(slot) = ruler.get_mut(mark + 1 + offset) {
                *slot = digit;
            }
        }
    }

    let mut result: String = ruler.into_iter().collect::<String>().trim_end().to_owned();
    result += "\n╭";
    result += &"─".repeat(width);
    result += "╮\n│";
    for position in 0..BOARD_LENGTH {
        if position == positions[0] {
            result.push('1');
        } else if position == positions[1] {
            result.push('2');
        } else {
            result.push('·');
        }
    }
    result += "│\n╰";
    result += &"─".repeat(width);
    result += "╯";
    result
}

/// The hand with 1-based slot numbers, e.g. `[1] 3  [2] 5`.
pub fn visualize_hand(hand: &[Card]) -> String {
    if hand.is_empty() {
        return String::from("(no cards)");
    }
    hand.iter()
        .enumerate()
        .map(|(idx, card)| format!("[{}] {}", idx + 1, card))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn visualize_snapshot(snapshot: &Snapshot) -> String {
    let [first, second] = snapshot.positions;
    let mut result = format!(
        "Round {} ({}) | Score {} : {} | Deck {}{} | Discard {}\n",
        snapshot.round,
        snapshot.mode,
        snapshot.scores[0],
        snapshot.scores[1],
        snapshot.deck_count,
        if snapshot.deck_exhausted { " (exhausted)" } else { "" },
        snapshot.discard_count,
    );
    result += &visualize_piste(snapshot.positions);
    result += &format!("\nDistance: {}\n", distance_between(first, second));
    for player in PlayerId::BOTH {
        let marker = if snapshot.acting_player == Some(player) { '>' } else { ' ' };
        result += &format!(
            "{}{}: {}\n",
            marker,
            player,
            visualize_hand(&snapshot.hands[player.index()])
        );
    }
    if let Some(attack) = &snapshot.attack {
        let cards: Vec<String> = attack.cards.iter().map(Card::to_string).collect();
        result += &format!(
            "Attack by {}: {} = {} ({:?})",
            attack.attacker,
            cards.join("+"),
            attack.total,
            attack.kind
        );
        if !attack.parry_selection.is_empty() {
            let parry: Vec<String> = attack.parry_selection.iter().map(Card::to_string).collect();
            result += &format!(", parry so far: {}", parry.join("+"));
        }
        result.push('\n');
    }
    if let Some(winner) = snapshot.match_winner {
        result += &format!("{} has won the match.\n", winner);
    } else if snapshot.phase == crate::PhaseKind::RoundEnd {
        match snapshot.round_winner {
            Some(winner) => result += &format!("{} won the round.\n", winner),
            None => result += "The round was drawn.\n",
        }
    }
    result
}
