use deforum_camera_core::codec::{
    decode_keyframes, encode_keyframes, encode_raw_frames, raw_frame_changes, reconstruct_step,
    retained_keyframes, snap_zero, Keyframe,
};

fn frames(keys: &[Keyframe]) -> Vec<usize> {
    keys.iter().map(|k| k.frame).collect()
}

#[test]
fn flat_series_keeps_only_ends() {
    for len in 2..12 {
        let series = vec![3.25; len];
        let kept = retained_keyframes(&series);
        assert_eq!(frames(&kept), vec![0, len - 1], "len={len}");
    }
}

#[test]
fn near_zero_snaps() {
    assert_eq!(encode_keyframes(&[1.0, 3e-6, 1.0]), encode_keyframes(&[1.0, 0.0, 1.0]));
    assert_eq!(encode_keyframes(&[1.0, 3e-6, 1.0]), "0:(1),1:(0),2:(1),");
    assert_ne!(encode_keyframes(&[1.0, 2e-5, 1.0]), encode_keyframes(&[1.0, 0.0, 1.0]));
    assert_eq!(encode_keyframes(&[-4e-6, 3e-6, 0.0]), "0:(0),2:(0),");
}

#[test]
fn run_length_boundaries() {
    assert_eq!(encode_keyframes(&[5.0, 5.0, 5.0]), "0:(5),2:(5),");
    assert_eq!(encode_keyframes(&[5.0, 5.0]), "0:(5),1:(5),");
    // A pair inside a longer series keeps both members.
    assert_eq!(encode_keyframes(&[1.0, 2.0, 2.0, 3.0]), "0:(1),1:(2),2:(2),3:(3),");
}

#[test]
fn tolerance_not_exact_equality() {
    let a = 0.1 + 0.2;
    let series = [0.3, a, 0.3];
    assert_eq!(frames(&retained_keyframes(&series)), vec![0, 2]);
    assert_eq!(frames(&raw_frame_changes(&series)), vec![0]);
}

#[test]
fn raw_frames_is_a_different_rule() {
    let series = [1.0, 1.0, 2.0, 2.0, 2.0, 1.0];
    assert_eq!(frames(&retained_keyframes(&series)), vec![0, 1, 2, 4, 5]);
    assert_eq!(frames(&raw_frame_changes(&series)), vec![0, 2, 5]);
    assert_eq!(encode_keyframes(&series), "0:(1),1:(1),2:(2),4:(2),5:(1),");
    assert_eq!(encode_raw_frames(&series), "0:(1),2:(2),5:(1)");
}

#[test]
fn raw_frames_do_not_snap() {
    assert_eq!(encode_raw_frames(&[3e-6, 3e-6, 0.0]), "0:(0.000003),2:(0)");
}

#[test]
fn decoded_keyframes_step_back_to_snapped_series() {
    let series = [
        0.0, 0.0, 0.0, 1.5, 1.5, 1.5, 1.5, -2.25, 4e-6, 0.0, 7.0, 7.0, 0.125,
    ];
    let encoded = encode_keyframes(&series);
    let keys = decode_keyframes(&encoded).unwrap();
    assert_eq!(keys, retained_keyframes(&series));

    let rebuilt = reconstruct_step(&keys, series.len());
    let snapped: Vec<f64> = series.iter().copied().map(snap_zero).collect();
    assert_eq!(rebuilt, snapped);
}

#[test]
fn raw_dump_decodes_too() {
    let series = [0.5, 0.5, 0.75, 0.75, 0.5];
    let keys = decode_keyframes(&encode_raw_frames(&series)).unwrap();
    assert_eq!(reconstruct_step(&keys, series.len()), series.to_vec());
}
