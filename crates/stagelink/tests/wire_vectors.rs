// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Cross-protocol wire vectors: byte-exact encodings observed against real
// hardware, pinned here so a codec refactor cannot drift the wire.

use std::net::Ipv4Addr;

use stagelink::panasonic::commands::{PanTiltPosition, Power, PowerReply};
use stagelink::panasonic::notify::{pack_frame, unpack_frame};
use stagelink::panasonic::values::{AwScalar, MoveUnit, Toggle};
use stagelink::panasonic::{
    new_response, AwEndpoint, AwRequest, AwResponse, ErrorReply, PackContext,
};
use stagelink::sony::params::AbsolutePanTiltParam;
use stagelink::sony::SonyParam;
use stagelink::videohub::{decode_block, Block};
use stagelink::yamaha::{decode_line, Incoming, ScpMessage};

#[test]
fn aw_power_on_wire_pair() {
    let request = Power { switch: Toggle::ON };
    assert_eq!(request.pack(), "#O1");

    let reply = new_response("p1");
    let power = reply.as_any().downcast_ref::<PowerReply>().unwrap();
    assert_eq!(power.switch, Toggle::ON);
}

#[test]
fn aw_absolute_position_wire() {
    let request = PanTiltPosition {
        pan: MoveUnit::from_degrees(-45.0),
        tilt: MoveUnit::from_degrees(45.0),
    };
    // -45 degrees is -5461 units, which sits above the wire center after
    // the axis inversion.
    assert_eq!(MoveUnit::from_degrees(-45.0).to_wire(), "9555");
    assert_eq!(request.pack(), "#APC95556AAB");
}

#[test]
fn sony_absolute_pan_tilt_vector() {
    let param = AbsolutePanTiltParam {
        pan: -40103,
        tilt: -9005,
        speed: 50,
    };
    assert_eq!(param.value(), "f6359,fdcd3,50");

    let mut parsed = AbsolutePanTiltParam::default();
    parsed.parse("f6359,fdcd3,50").unwrap();
    assert_eq!(parsed, param);
}

#[test]
fn videohub_device_block_vector() {
    let block =
        decode_block("VIDEOHUB DEVICE:\nModel name: SmartVideohub\nVideo inputs: 40\n").unwrap();
    match block {
        Block::Device(d) => {
            assert_eq!(d.model_name, "SmartVideohub");
            assert_eq!(d.video_inputs, Some(40));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn yamaha_fader_notify_vector() {
    let incoming =
        decode_line("NOTIFY set MIXER:Current/InCh/Fader/Level 0 0 -32768").unwrap();
    match incoming {
        Incoming::Notify(ScpMessage::Int(p)) => {
            assert!(p.set);
            assert_eq!(p.address, "MIXER:Current/InCh/Fader/Level");
            assert_eq!((p.x, p.y, p.value), (0, 0, -32768));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn aw_notification_frame_vector() {
    let frame = pack_frame(
        "pS75",
        1,
        Ipv4Addr::new(192, 168, 0, 10),
        [0x00, 0x80, 0x45, 0xAA, 0xBB, 0xCC],
    );
    assert_eq!(unpack_frame(&frame).unwrap(), "pS75");
    // Counter 1, big-endian, at offset 4.
    assert_eq!(&frame[4..6], &[0x00, 0x01]);
}

#[test]
fn aw_error_endpoint_quirk_vector() {
    let error = ErrorReply::unsupported("APC");
    assert_eq!(
        error.pack_for(PackContext::Endpoint(AwEndpoint::Ptz)),
        "eR1:APC"
    );
    assert_eq!(
        error.pack_for(PackContext::Endpoint(AwEndpoint::Cam)),
        "ER1:APC"
    );
}
