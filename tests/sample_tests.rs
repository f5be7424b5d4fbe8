//! Rescale and sampler tests

mod common;

use common::{raw_for, FixedAdc, SequenceAdc};
use rust_voice_link::hal::{AnalogInput, ADC_MAX};
use rust_voice_link::sample::{rescale, Sampler};

#[test]
fn test_rescale_endpoints() {
    assert_eq!(rescale(0), 0);
    assert_eq!(rescale(ADC_MAX), 255);
}

#[test]
fn test_rescale_monotonic_over_full_domain() {
    let mut previous = rescale(0);
    for raw in 1..=ADC_MAX {
        let out = rescale(raw);
        assert!(out >= previous, "raw {} -> {} after {}", raw, out, previous);
        previous = out;
    }
}

#[test]
fn test_rescale_hits_every_output_value() {
    let mut seen = [false; 256];
    for raw in 0..=ADC_MAX {
        seen[rescale(raw) as usize] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
fn test_out_of_range_reading_saturates() {
    for raw in [4096u16, 5000, u16::MAX] {
        assert_eq!(rescale(raw), 255);
    }
}

#[test]
fn test_sampler_reads_once_per_sample() {
    let mut sampler = Sampler::new(SequenceAdc::default());
    let samples: Vec<u8> = (0..5).map(|_| sampler.sample()).collect();
    assert_eq!(samples, vec![0, 1, 2, 3, 4]);
    assert_eq!(sampler.source().reads, 5);
}

#[test]
fn test_sampler_over_boxed_source() {
    let source: Box<dyn AnalogInput> = Box::new(FixedAdc(ADC_MAX));
    let mut sampler = Sampler::new(source);
    assert_eq!(sampler.sample(), 255);
}

#[test]
fn test_mid_scale_reading() {
    let mut sampler = Sampler::new(FixedAdc(2048));
    assert_eq!(sampler.sample(), 127);
}

#[test]
fn test_raw_for_helper_is_exact() {
    for value in 0..=255u8 {
        assert_eq!(rescale(raw_for(value)), value);
    }
}
