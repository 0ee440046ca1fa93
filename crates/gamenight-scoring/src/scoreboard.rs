//! Scoreboard aggregation over round-score rows.

use gamenight_protocol::{GameType, UserId};
use serde::{Deserialize, Serialize};

/// One recorded round score, as read back from the store in insertion
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub user_id: UserId,
    pub display_name: String,
    pub game_type: GameType,
    pub round: u32,
    pub score: i64,
}

/// A player's standing on the scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    pub user_id: UserId,
    pub display_name: String,
    pub total: i64,
}

/// Sums rows per player and orders the result by total, descending.
///
/// Players are accumulated in first-seen order and the sort is stable,
/// so equal totals keep their insertion order — the ordering is total
/// and a repeated read over the same rows yields the same board.
pub fn aggregate(rows: &[ScoreRow]) -> Vec<ScoreboardEntry> {
    let mut entries: Vec<ScoreboardEntry> = Vec::new();

    for row in rows {
        match entries.iter_mut().find(|e| e.user_id == row.user_id) {
            Some(entry) => entry.total += row.score,
            None => entries.push(ScoreboardEntry {
                user_id: row.user_id,
                display_name: row.display_name.clone(),
                total: row.score,
            }),
        }
    }

    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: i64, name: &str, score: i64) -> ScoreRow {
        ScoreRow {
            user_id: UserId(user),
            display_name: name.to_string(),
            game_type: GameType::Blindtest,
            round: 1,
            score,
        }
    }

    #[test]
    fn test_aggregate_sums_per_player() {
        let rows = vec![
            row(1, "alice", 100),
            row(2, "bob", 75),
            row(1, "alice", 50),
        ];
        let board = aggregate(&rows);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, UserId(1));
        assert_eq!(board[0].total, 150);
        assert_eq!(board[1].total, 75);
    }

    #[test]
    fn test_aggregate_orders_by_total_descending() {
        let rows = vec![row(1, "alice", 10), row(2, "bob", 90), row(3, "carol", 40)];
        let board = aggregate(&rows);
        let names: Vec<&str> =
            board.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol", "alice"]);
    }

    #[test]
    fn test_aggregate_ties_keep_first_seen_order() {
        let rows = vec![
            row(2, "bob", 50),
            row(1, "alice", 50),
            row(3, "carol", 50),
        ];
        let board = aggregate(&rows);
        let ids: Vec<i64> = board.iter().map(|e| e.user_id.0).collect();
        // bob appeared first in the rows, so bob leads the tie.
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let rows = vec![row(1, "alice", 100), row(2, "bob", 100), row(1, "alice", 25)];
        assert_eq!(aggregate(&rows), aggregate(&rows));
    }

    #[test]
    fn test_aggregate_empty_rows() {
        assert!(aggregate(&[]).is_empty());
    }
}
