//! Byte stream to output sample checks across decoder, envelope and player.

use brr::brr::BLOCK_SIZE;
use brr::{decode_slice, AdsrPhase, BlockDump, Envelope, Playback, PlaybackConfig, SampleStream};

/// Encode one block: header fields plus 16 nibbles (low 4 bits used)
fn encode_block(range: u8, filter: u8, loop_flag: bool, end: bool, nibbles: [u8; 16]) -> [u8; BLOCK_SIZE] {
    let mut bytes = [0u8; BLOCK_SIZE];
    bytes[0] = (range << 4) | (filter << 2) | (u8::from(loop_flag) << 1) | u8::from(end);
    for (i, pair) in nibbles.chunks_exact(2).enumerate() {
        bytes[i + 1] = ((pair[0] & 0x0F) << 4) | (pair[1] & 0x0F);
    }
    bytes
}

fn two_block_stream(nibble: u8) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&encode_block(0, 0, false, false, [nibble; 16]));
    data.extend_from_slice(&encode_block(0, 0, false, true, [nibble; 16]));
    data
}

#[test]
fn small_values_floor_to_zero_at_unity_gain() {
    let blocks = decode_slice(&two_block_stream(1), 0, None).unwrap();
    assert_eq!(blocks.len(), 2);

    let config = PlaybackConfig::default();
    assert_eq!(config.envelope(), Envelope::Direct { level: 0x800 });

    let output: Vec<i32> = Playback::new(blocks, &config).unwrap().collect();
    assert_eq!(output, vec![0; 32]);
}

#[test]
fn nibble_sign_extension_through_decoder() {
    let mut nibbles = [0u8; 16];
    nibbles[0] = 0xF;
    nibbles[1] = 0x8;
    nibbles[2] = 0x7;
    let data = encode_block(1, 0, false, true, nibbles);
    let blocks = decode_slice(&data, 0, None).unwrap();
    assert_eq!(&blocks[0].nibbles[..3], &[-1, -8, 7]);

    // range 1: (n << 1) >> 1 == n
    let samples: Vec<i32> = SampleStream::new(blocks).take(3).collect();
    assert_eq!(samples, vec![-1, -8, 7]);
}

#[test]
fn loop_seam_matches_natural_repeat() {
    let a = encode_block(9, 2, true, false, [3, 14, 7, 1, 9, 0, 12, 5, 2, 2, 8, 15, 4, 6, 11, 1]);
    let b = encode_block(8, 3, false, true, [1, 5, 13, 0, 7, 9, 3, 3, 10, 2, 6, 15, 0, 4, 8, 12]);

    let looped_blocks = decode_slice(&[a, b].concat(), 0, None).unwrap();
    let config = PlaybackConfig::default().with_loop_block(0);
    let looped: Vec<i32> = Playback::new(looped_blocks, &config).unwrap().take(32 + 16).collect();

    // Same data with A physically repeated, decoded in one straight pass
    let mut a_copy = a;
    a_copy[0] &= !0x01;
    let mut b_copy = b;
    b_copy[0] &= !0x01;
    let mut a_end = a;
    a_end[0] |= 0x01;
    let straight_blocks = decode_slice(&[a_copy, b_copy, a_end].concat(), 0, None).unwrap();
    let straight: Vec<i32> = Playback::new(straight_blocks, &PlaybackConfig::default())
        .unwrap()
        .collect();

    assert_eq!(looped, straight);
}

#[test]
fn loop_header_flag_does_not_drive_looping() {
    let data = encode_block(0, 0, true, true, [4; 16]);
    let blocks = decode_slice(&data, 0, None).unwrap();
    assert!(blocks[0].is_loop());

    let playback = Playback::new(blocks, &PlaybackConfig::default()).unwrap();
    assert_eq!(playback.count(), 16);
}

#[test]
fn adsr_loop_fades_out_and_stops() {
    // Fast attack, decay 7, sustain level 0, sustain rate 31
    let data = two_block_stream(6);
    let blocks = decode_slice(&data, 0, None).unwrap();
    let config = PlaybackConfig::default()
        .with_adsr([0xFF, 0x1F])
        .with_gain(0x7F)
        .with_loop_block(1);

    let mut playback = Playback::new(blocks, &config).unwrap();
    let produced = playback.by_ref().take(1_000_000).count();

    assert!(playback.is_finished());
    assert!(produced < 1_000_000);
    assert!(playback.loop_count() > 0);
    assert_eq!(playback.envelope().level(), 0);
    match playback.envelope() {
        Envelope::Adsr(adsr) => assert_eq!(adsr.phase(), AdsrPhase::Release),
        other => panic!("ADSR should win over gain, got {:?}", other),
    }
    // Output stops at a pass boundary: 32 samples, then 16 per loop
    assert_eq!((produced - 32) % 16, 0);
}

#[test]
fn truncated_input_needs_override() {
    let mut data = encode_block(0, 0, false, false, [1; 16]).to_vec();
    data.extend_from_slice(&encode_block(0, 0, false, false, [1; 16]));

    assert!(decode_slice(&data, 0, None).is_err());
    let blocks = decode_slice(&data, 0, Some(8)).unwrap();
    let playback = Playback::new(blocks, &PlaybackConfig::default()).unwrap();
    assert_eq!(playback.count(), 32);
}

#[test]
fn dump_matches_playback_at_unity() {
    let data = [
        encode_block(10, 1, false, false, [5, 3, 1, 15, 14, 2, 0, 0, 7, 7, 8, 8, 1, 2, 3, 4]),
        encode_block(6, 2, false, true, [0; 16]),
    ]
    .concat();
    let blocks = decode_slice(&data, 0, None).unwrap();
    let dumps = BlockDump::collect(&blocks);
    let pcm: Vec<i32> = Playback::new(blocks, &PlaybackConfig::default()).unwrap().collect();

    let dumped: Vec<i32> = dumps.iter().flat_map(|d| d.samples).collect();
    assert_eq!(dumped, pcm);
}
