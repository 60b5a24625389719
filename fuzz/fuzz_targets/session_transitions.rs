#![no_main]

use libfuzzer_sys::fuzz_target;
use mixtape::audio::NullEngine;
use mixtape::session::{Direction, PlaybackSession};
use std::path::PathBuf;

fuzz_target!(|data: &[u8]| {
    let mut session = PlaybackSession::new();
    let mut engine = NullEngine::new();

    let len = (data.len() % 16).max(1);
    let tracks: Vec<PathBuf> = (0..len)
        .map(|idx| PathBuf::from(format!("track_{idx}.mp3")))
        .collect();
    let _ = session.load_queue(tracks, 0, &mut engine);

    for byte in data {
        match byte % 8 {
            0 => {
                let _ = session.advance(Direction::Next, &mut engine);
            }
            1 => {
                let _ = session.advance(Direction::Previous, &mut engine);
            }
            2 => session.set_shuffle(!session.shuffle()),
            3 => session.set_repeat_one(!session.repeat_one()),
            4 => {
                let _ = session.on_media_finished(&mut engine);
            }
            5 => session.on_duration_changed(u64::from(*byte) * 1_000),
            6 => session.on_position_changed(u64::from(*byte) * 500),
            _ => {
                let _ = session.seek_to(f64::from(*byte) / 255.0, &mut engine);
            }
        }

        if let Some(idx) = session.current_index() {
            assert!(idx < session.queue().len());
        }
    }
});
