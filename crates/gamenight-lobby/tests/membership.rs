//! Randomized membership sequences: whatever order joins and leaves
//! arrive in, a room never exceeds capacity and never holds duplicates.

use gamenight_lobby::{LobbyError, Room};
use gamenight_protocol::{GameType, RoomId, UserId};
use rand::Rng;

#[test]
fn test_capacity_never_exceeded_under_random_join_leave() {
    let mut rng = rand::rng();

    for _ in 0..50 {
        let mut room = Room::new(
            RoomId(1),
            "aabbcc",
            GameType::Petitbac,
            UserId(1),
            "host",
        );

        for _ in 0..500 {
            let user = UserId(rng.random_range(1..=25));
            if rng.random_bool(0.6) {
                match room.join(user, format!("p{}", user.0)) {
                    Ok(()) => {}
                    Err(LobbyError::RoomFull(_))
                    | Err(LobbyError::AlreadyJoined(..)) => {}
                    Err(other) => panic!("unexpected join error: {other}"),
                }
            } else {
                room.leave(user);
            }

            assert!(
                room.players.len() <= room.capacity,
                "capacity exceeded: {}",
                room.players.len()
            );

            let mut ids: Vec<i64> =
                room.players.iter().map(|p| p.user_id.0).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), room.players.len(), "duplicate member");
        }
    }
}

#[test]
fn test_waiting_to_playing_end_to_end() {
    let mut room =
        Room::new(RoomId(7), "0f0f0f", GameType::Blindtest, UserId(1), "host");
    room.join(UserId(2), "bob").unwrap();
    assert!(room.is_ready());

    // A non-host cannot start.
    assert_eq!(room.start(UserId(2)), Err(LobbyError::Forbidden));

    room.start(UserId(1)).unwrap();

    // Late joiner is turned away once playing.
    assert!(matches!(
        room.join(UserId(3), "carol"),
        Err(LobbyError::GameAlreadyStarted(RoomId(7)))
    ));
}
