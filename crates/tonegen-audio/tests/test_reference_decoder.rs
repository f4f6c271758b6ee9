//! Cross-checks encoded output against an independent WAV decoder.

use std::io::Cursor;

use tonegen_audio::{encode, synthesize, AudioError, ToneParameters, WavHeader};

#[test]
fn test_hound_reads_encoded_tone() {
    let samples = synthesize(440.0, 44100, 0.5).unwrap();
    let wav = encode(&samples, 44100).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(wav.as_bytes())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration() as usize, samples.len());

    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(decoded.as_slice(), samples.as_slice());
}

#[test]
fn test_hound_reads_single_sample() {
    let wav = encode(&[-12345], 8000).unwrap();
    let mut reader = hound::WavReader::new(Cursor::new(wav.into_bytes())).unwrap();
    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(decoded, vec![-12345]);
}

#[test]
fn test_default_tone_end_to_end() {
    let params = ToneParameters::default();
    let samples = params.synthesize().unwrap();
    let wav = encode(&samples, params.sample_rate).unwrap();

    assert_eq!(samples.len(), 220_500);
    assert_eq!(wav.len(), 44 + 220_500 * 2);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(&wav[36..40], b"data");

    let header = WavHeader::parse(&wav).unwrap();
    assert_eq!(header.num_samples(), 220_500);
}

#[test]
fn test_render_is_byte_identical_across_calls() {
    let render = || {
        let samples = synthesize(440.0, 44100, 1.0).unwrap();
        encode(&samples, 44100).unwrap()
    };
    let a = render();
    let b = render();
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_eq!(a.pcm_hash(), b.pcm_hash());
}

#[test]
fn test_samples_stay_in_range_and_track_sine() {
    let samples = synthesize(440.0, 44100, 1.0).unwrap();
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
    // 440 Hz at 44.1 kHz lands within a fraction of a sample of each crest
    assert!(peak > 32700, "peak {peak} too low");
    assert!(samples.iter().all(|&s| (-32767..=32767).contains(&s)));
}

#[test]
fn test_invalid_parameters_never_reach_encoder() {
    assert!(matches!(
        synthesize(0.0, 44100, 1.0),
        Err(AudioError::InvalidParameter { .. })
    ));
    assert!(matches!(encode(&[], 44100), Err(AudioError::Encoding { .. })));
}
