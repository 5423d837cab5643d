use super::*;

fn ramp(frames: u64) -> AudioTrack {
    let mut v = Vec::new();
    for i in 0..frames {
        let s = i as f32 / 100.0;
        v.push(s);
        v.push(-s);
    }
    AudioTrack::new(MIX_SAMPLE_RATE, MIX_CHANNELS, v).unwrap()
}

#[test]
fn new_rejects_bad_layouts() {
    assert!(AudioTrack::new(0, 2, vec![]).is_err());
    assert!(AudioTrack::new(48_000, 2, vec![0.0; 3]).is_err());
}

#[test]
fn fit_to_pads_and_trims() {
    let t = ramp(10);
    assert_eq!(t.clone().fit_to(4).len_frames(), 4);
    let padded = t.fit_to(15);
    assert_eq!(padded.len_frames(), 15);
    assert_eq!(padded.interleaved[29], 0.0);
}

#[test]
fn loop_short_track_to_exact_length() {
    // 1.0 s of audio looped against a 5.5 s master.
    let one_sec = AudioTrack::silence(48_000).scaled(0.0);
    let master = (5.5 * 48_000.0) as u64;
    let looped = one_sec.looped_to(master).unwrap();
    assert_eq!(looped.len_frames(), master);
    assert!((looped.duration_secs() - 5.5).abs() < 1e-12);
}

#[test]
fn loop_repeats_content_in_order() {
    let t = ramp(3);
    let looped = t.looped_to(7).unwrap();
    let lefts: Vec<f32> = looped.interleaved.chunks_exact(2).map(|f| f[0]).collect();
    assert_eq!(lefts, vec![0.0, 0.01, 0.02, 0.0, 0.01, 0.02, 0.0]);
}

#[test]
fn loop_longer_track_trims() {
    let t = ramp(10);
    assert_eq!(t.looped_to(6).unwrap().len_frames(), 6);
}

#[test]
fn loop_empty_track_is_an_error() {
    let empty = AudioTrack::silence(0);
    assert!(empty.looped_to(10).is_err());
}

#[test]
fn mix_in_adds_and_clamps() {
    let mut a = AudioTrack::new(48_000, 2, vec![0.5, 0.5, 0.9, -0.9]).unwrap();
    let b = AudioTrack::new(48_000, 2, vec![0.25, -0.25, 0.5, -0.5]).unwrap();
    a.mix_in(&b).unwrap();
    assert_eq!(a.interleaved, vec![0.75, 0.25, 1.0, -1.0]);

    let mono = AudioTrack::new(48_000, 1, vec![0.1]).unwrap();
    assert!(a.mix_in(&mono).is_err());
}

#[test]
fn slice_and_append() {
    let t = ramp(10);
    let mut head = t.slice(0, 4);
    let tail = t.slice(4, 100);
    assert_eq!(head.len_frames(), 4);
    assert_eq!(tail.len_frames(), 6);
    head.append(&tail).unwrap();
    assert_eq!(head, t);
}

#[test]
fn mono_source_upmixes_and_resamples() {
    let mono = AudioTrack::new(24_000, 1, vec![0.5; 24_000]).unwrap();
    let mixed = mono.into_mix_format();
    assert_eq!(mixed.sample_rate, MIX_SAMPLE_RATE);
    assert_eq!(mixed.channels, MIX_CHANNELS);
    assert_eq!(mixed.len_frames(), 48_000);
    assert!(mixed.interleaved.iter().all(|&s| (s - 0.5).abs() < 1e-6));
}
