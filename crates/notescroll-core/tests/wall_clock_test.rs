use notescroll_core::WallClockPlayer;
use notescroll_ports::player::{AudioPlayerPort, PlayerError, POSITION_NOT_STARTED};
use std::path::Path;
use std::thread;
use std::time::Duration;

#[test]
fn reports_not_started_until_play() {
    let mut player = WallClockPlayer::new();
    assert_eq!(player.position_ms(), POSITION_NOT_STARTED);
    player.load(Path::new("song.mid")).unwrap();
    assert_eq!(player.position_ms(), POSITION_NOT_STARTED);
    player.play().unwrap();
    assert!(player.position_ms() >= 0);
}

#[test]
fn refuses_to_play_before_load() {
    let mut player = WallClockPlayer::new();
    assert!(matches!(player.play(), Err(PlayerError::NotLoaded)));
}

#[test]
fn pause_freezes_position() {
    let mut player = WallClockPlayer::new();
    player.load(Path::new("song.mid")).unwrap();
    player.play().unwrap();
    thread::sleep(Duration::from_millis(20));
    player.pause().unwrap();

    let paused_at = player.position_ms();
    assert!(paused_at >= 20);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(player.position_ms(), paused_at);

    player.unpause().unwrap();
    thread::sleep(Duration::from_millis(5));
    assert!(player.position_ms() >= paused_at);
}
