// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Registry-wide properties of the Sony parameter table: every registered
// key must build its typed variant (never the passthrough), and every
// typed variant must round-trip its own wire value.

use stagelink::sony::{new_param, registered_keys, Endpoint, SonyParam, UnknownParam};

/// A representative valid wire value for every registered key. A new
/// registration without a sample here fails the tests below loudly.
fn sample_value(key: &str) -> &'static str {
    match key {
        "AbsolutePanTilt" | "RelativePanTilt" => "f6359,fdcd3,25",
        "PanTiltMove" => "up-left,24",
        "AbsoluteZoom" | "AbsoluteFocus" => "1e80",
        "ZoomMove" => "tele,4",
        "FocusMode" => "manual",
        "PresetCall" => "3,24",
        "PresetSet" => "7",
        "ExpCompensation" => "-3",
        "WhiteBalanceMode" => "atw",
        "inq" | "inqjson" => "ptzf",
        "SubscriptionDuration" => "30",
        "SubscriptionId" => "abc123",
        "_" => "1690000000",
        other => panic!("no sample value for registered key {other:?}"),
    }
}

#[test]
fn every_registered_key_builds_its_typed_variant() {
    for endpoint in Endpoint::ALL {
        for key in registered_keys(endpoint) {
            let param = new_param(endpoint, key, sample_value(key));
            assert!(
                !param.as_any().is::<UnknownParam>(),
                "{key} on {endpoint} fell through to the passthrough variant"
            );
            assert_eq!(param.key(), key);
        }
    }
}

#[test]
fn every_registered_variant_round_trips_its_value() {
    for endpoint in Endpoint::ALL {
        for key in registered_keys(endpoint) {
            let first = new_param(endpoint, key, sample_value(key));
            let second = new_param(endpoint, key, &first.value());
            assert_eq!(
                first.value(),
                second.value(),
                "{key} on {endpoint} drifted across a round trip"
            );
            assert!(
                first.valid(),
                "sample value for {key} on {endpoint} should be in range"
            );
        }
    }
}

#[test]
fn parameter_endpoints_have_registrations() {
    // Each device endpoint this crate types parameters for, plus all four
    // meta endpoints, must expose at least one key.
    for endpoint in [
        Endpoint::Ptzf,
        Endpoint::PresetPosition,
        Endpoint::Imaging,
        Endpoint::Inquiry,
        Endpoint::Subscribe,
        Endpoint::PullInquiry,
        Endpoint::Unsubscribe,
    ] {
        assert!(
            !registered_keys(endpoint).is_empty(),
            "{endpoint} has no registered parameters"
        );
    }
}
