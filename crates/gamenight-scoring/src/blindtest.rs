//! Blindtest scoring: points by finish position.

/// Points awarded for answering correctly in the given finish position
/// (1-based).
///
/// The podium gets fixed awards (100 / 75 / 50); from fourth place on,
/// the score decays by 15 per rank with a floor of 10, giving the
/// five-player sequence 100, 75, 50, 40, 25. The result never increases
/// with position.
///
/// `_total_players` is carried by the submission payload but does not
/// affect the award.
pub fn ranked_points(position: u32, _total_players: u32) -> u32 {
    match position {
        0 | 1 => 100,
        2 => 75,
        3 => 50,
        p => (100u32.saturating_sub(p * 15)).max(10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_points_five_player_vector() {
        let points: Vec<u32> =
            (1..=5).map(|p| ranked_points(p, 5)).collect();
        assert_eq!(points, vec![100, 75, 50, 40, 25]);
    }

    #[test]
    fn test_ranked_points_monotone_with_floor() {
        let mut previous = u32::MAX;
        for position in 1..=40 {
            let points = ranked_points(position, 40);
            assert!(points <= previous, "score increased at {position}");
            assert!(points >= 10, "floor violated at {position}");
            previous = points;
        }
    }

    #[test]
    fn test_ranked_points_floor_reached() {
        assert_eq!(ranked_points(6, 10), 10);
        assert_eq!(ranked_points(7, 10), 10);
        assert_eq!(ranked_points(100, 100), 10);
    }

    #[test]
    fn test_ranked_points_ignores_total_players() {
        assert_eq!(ranked_points(2, 2), ranked_points(2, 10));
    }
}
