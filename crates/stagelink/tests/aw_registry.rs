// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Registry-wide properties of the AW command tables. Every registered
// variant must round-trip generated wire tokens, self-match its own
// signature, and win dispatch for its own traffic - for every seed, not
// just the handful of tokens the unit tests pin down.

use std::any::Any;

use stagelink::panasonic::msg::{
    new_request, new_response, request_table, response_table, AwRequest, AwResponse,
};
use stagelink::wire::pattern::{generate, matches};

const SEEDS: [i64; 6] = [-1, 0, 1, 42, 9999, i64::MAX];

#[test]
fn request_round_trip_for_every_seed() {
    for entry in request_table() {
        for seed in SEEDS {
            let wire = generate(entry.signature, seed);
            let req = new_request(&wire);
            assert_eq!(
                req.pack(),
                wire,
                "request {:?} seed {} did not round-trip",
                entry.signature,
                seed
            );
        }
    }
}

#[test]
fn response_round_trip_for_every_seed() {
    for entry in response_table() {
        for seed in SEEDS {
            let wire = generate(entry.signature, seed);
            let res = new_response(&wire);
            assert_eq!(
                res.pack(),
                wire,
                "response {:?} seed {} did not round-trip",
                entry.signature,
                seed
            );
        }
    }
}

#[test]
fn request_signatures_are_self_consistent() {
    for entry in request_table() {
        let fresh = (entry.make)();
        assert_eq!(
            fresh.signature(),
            entry.signature,
            "factory output disagrees with registration"
        );
        let packed = fresh.pack();
        assert!(
            matches(entry.signature, packed.as_bytes()),
            "{:?} does not match its own pack {:?}",
            entry.signature,
            packed
        );
    }
}

#[test]
fn response_signatures_are_self_consistent() {
    for entry in response_table() {
        let fresh = (entry.make)();
        assert_eq!(
            fresh.signature(),
            entry.signature,
            "factory output disagrees with registration"
        );
        let packed = fresh.pack();
        assert!(
            matches(entry.signature, packed.as_bytes()),
            "{:?} does not match its own pack {:?}",
            entry.signature,
            packed
        );
    }
}

#[test]
fn request_dispatch_is_unambiguous() {
    for entry in request_table() {
        let expected = (entry.make)().as_any().type_id();
        for seed in SEEDS {
            let wire = generate(entry.signature, seed);
            let got = new_request(&wire);
            assert_eq!(
                got.as_any().type_id(),
                expected,
                "token {:?} (from {:?}) dispatched to another variant",
                wire,
                entry.signature
            );
        }
    }
}

#[test]
fn response_dispatch_is_unambiguous() {
    for entry in response_table() {
        let expected = (entry.make)().as_any().type_id();
        for seed in SEEDS {
            let wire = generate(entry.signature, seed);
            let got = new_response(&wire);
            assert_eq!(
                got.as_any().type_id(),
                expected,
                "token {:?} (from {:?}) dispatched to another variant",
                wire,
                entry.signature
            );
        }
    }
}

#[test]
fn expected_responses_are_registered() {
    // Every command's expected reply class must be reachable through
    // dispatch, or the client would never type a camera's answer.
    let known: Vec<std::any::TypeId> = response_table()
        .iter()
        .map(|e| (e.make)().as_any().type_id())
        .collect();
    for entry in request_table() {
        let reply = (entry.make)().expected_response();
        assert!(
            known.contains(&reply.as_any().type_id()),
            "expected response of {:?} is not in the response table",
            entry.signature
        );
    }
}
