// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The concrete AW command/reply roster.
//!
//! One file per concern:
//!
//! - [`ptz`] - power, install position, tally, pan/tilt motion and position
//! - [`lens`] - zoom, focus, iris
//! - [`preset`] - preset save/recall/delete, transition speed, entry masks
//! - [`cam`] - camera-side image controls (`/cgi-bin/aw_cam` tokens)
//!
//! [`request_roster`] and [`response_roster`] list every variant in dispatch
//! order; `msg::request_table` consumes them exactly once. Registration
//! order is part of the wire contract - the first matching signature wins -
//! so entries here are grouped by subsystem and never reordered casually.

pub mod cam;
pub mod lens;
pub mod preset;
pub mod ptz;

pub use cam::{
    AutoFocus, AutoFocusQuery, AutoFocusReply, BGain, BGainReply, ColorBar, ColorBarReply,
    GainQuery, GainReply, GainSet, ModelQuery, ModelReply, NdFilterQuery, NdFilterReply,
    NdFilterSet, OnePushWhiteBalance, OnePushWhiteBalanceReply, Pedestal, PedestalQuery,
    PedestalReply, RGain, RGainReply, Shutter, ShutterQuery, ShutterReply, WhiteBalanceMode,
    WhiteBalanceModeReply, WhiteBalanceQuery,
};
pub use lens::{
    FocusLevelReply, FocusPosition, FocusPositionReply, FocusQuery, FocusSpeed, FocusSpeedReply,
    IrisLevelReply, IrisPosition, IrisPositionReply, IrisQuery, LensInfoControl,
    LensInfoControlReply, LensPositionReply, ZoomLevelReply, ZoomPosition, ZoomPositionReply,
    ZoomQuery, ZoomSpeed, ZoomSpeedReply,
};
pub use preset::{
    combine_entry_pages, PresetDelete, PresetDoneReply, PresetEntriesQuery, PresetEntriesReply,
    PresetRecall, PresetSave, PresetSpeed, PresetSpeedReply,
};
pub use ptz::{
    InstallPosition, InstallPositionQuery, InstallPositionReply, PanSpeed, PanSpeedReply,
    PanTiltPosition,
    PanTiltPositionReply, PanTiltPositionSpeed, PanTiltPositionSpeedReply, PanTiltSpeed,
    PanTiltSpeedReply, Power, PowerQuery, PowerReply, Tally, TallyQuery, TallyReply, TiltSpeed,
    TiltSpeedReply,
};

use super::msg::{
    ErrorReply, RequestEntry, ResponseEntry, SIG_ERR_LOWER, SIG_ERR_LOWER_FLAG, SIG_ERR_UPPER,
    SIG_ERR_UPPER_FLAG,
};

macro_rules! req {
    ($sig:expr, $ty:ty) => {
        RequestEntry {
            signature: $sig,
            make: || Box::new(<$ty>::default()),
        }
    };
}

macro_rules! res {
    ($sig:expr, $ty:ty) => {
        ResponseEntry {
            signature: $sig,
            make: || Box::new(<$ty>::default()),
        }
    };
}

/// Every request variant, in dispatch order.
pub(crate) fn request_roster() -> Vec<RequestEntry> {
    vec![
        // Power, install, tally
        req!(ptz::SIG_POWER, Power),
        req!(ptz::SIG_POWER_QUERY, PowerQuery),
        req!(ptz::SIG_INSTALL, InstallPosition),
        req!(ptz::SIG_INSTALL_QUERY, InstallPositionQuery),
        req!(ptz::SIG_TALLY, Tally),
        req!(ptz::SIG_TALLY_QUERY, TallyQuery),
        // Pan/tilt
        req!(ptz::SIG_PAN_SPEED, PanSpeed),
        req!(ptz::SIG_TILT_SPEED, TiltSpeed),
        req!(ptz::SIG_PAN_TILT_SPEED, PanTiltSpeed),
        req!(ptz::SIG_PAN_TILT_POSITION, PanTiltPosition),
        req!(ptz::SIG_PAN_TILT_POSITION_SPEED, PanTiltPositionSpeed),
        // Lens
        req!(lens::SIG_ZOOM_SPEED, ZoomSpeed),
        req!(lens::SIG_ZOOM_POSITION, ZoomPosition),
        req!(lens::SIG_ZOOM_QUERY, ZoomQuery),
        req!(lens::SIG_FOCUS_SPEED, FocusSpeed),
        req!(lens::SIG_FOCUS_POSITION, FocusPosition),
        req!(lens::SIG_FOCUS_QUERY, FocusQuery),
        req!(lens::SIG_IRIS_POSITION, IrisPosition),
        req!(lens::SIG_IRIS_QUERY, IrisQuery),
        req!(lens::SIG_LENS_INFO_CONTROL, LensInfoControl),
        // Presets
        req!(preset::SIG_SAVE, PresetSave),
        req!(preset::SIG_RECALL, PresetRecall),
        req!(preset::SIG_DELETE, PresetDelete),
        req!(preset::SIG_SPEED, PresetSpeed),
        req!(preset::SIG_ENTRIES_QUERY, PresetEntriesQuery),
        // Camera-side controls
        req!(cam::SIG_AUTOFOCUS, AutoFocus),
        req!(cam::SIG_AUTOFOCUS_QUERY, AutoFocusQuery),
        req!(cam::SIG_COLOR_BAR, ColorBar),
        req!(cam::SIG_ND_FILTER, NdFilterSet),
        req!(cam::SIG_ND_FILTER_QUERY, NdFilterQuery),
        req!(cam::SIG_GAIN, GainSet),
        req!(cam::SIG_GAIN_QUERY, GainQuery),
        req!(cam::SIG_SHUTTER, Shutter),
        req!(cam::SIG_SHUTTER_QUERY, ShutterQuery),
        req!(cam::SIG_WHITE_BALANCE, WhiteBalanceMode),
        req!(cam::SIG_WHITE_BALANCE_QUERY, WhiteBalanceQuery),
        req!(cam::SIG_ONE_PUSH_WB, OnePushWhiteBalance),
        req!(cam::SIG_PEDESTAL, Pedestal),
        req!(cam::SIG_PEDESTAL_QUERY, PedestalQuery),
        req!(cam::SIG_R_GAIN, RGain),
        req!(cam::SIG_B_GAIN, BGain),
        req!(cam::SIG_MODEL_QUERY, ModelQuery),
    ]
}

/// Every response variant, in dispatch order. Error replies come first:
/// they are the most distinctive tokens and every command can produce one.
pub(crate) fn response_roster() -> Vec<ResponseEntry> {
    vec![
        ResponseEntry {
            signature: SIG_ERR_UPPER,
            make: || Box::new(ErrorReply::default()),
        },
        ResponseEntry {
            signature: SIG_ERR_UPPER_FLAG,
            make: || {
                Box::new(ErrorReply {
                    flag: "000".to_string(),
                    ..ErrorReply::default()
                })
            },
        },
        ResponseEntry {
            signature: SIG_ERR_LOWER,
            make: || {
                Box::new(ErrorReply {
                    capitalized: false,
                    ..ErrorReply::default()
                })
            },
        },
        ResponseEntry {
            signature: SIG_ERR_LOWER_FLAG,
            make: || {
                Box::new(ErrorReply {
                    capitalized: false,
                    flag: "000".to_string(),
                    ..ErrorReply::default()
                })
            },
        },
        // Power, install, tally
        res!(ptz::SIG_POWER_REPLY, PowerReply),
        res!(ptz::SIG_INSTALL_REPLY, InstallPositionReply),
        res!(ptz::SIG_TALLY_REPLY, TallyReply),
        // Pan/tilt
        res!(ptz::SIG_PAN_SPEED_REPLY, PanSpeedReply),
        res!(ptz::SIG_TILT_SPEED_REPLY, TiltSpeedReply),
        res!(ptz::SIG_PAN_TILT_SPEED_REPLY, PanTiltSpeedReply),
        res!(ptz::SIG_PAN_TILT_POSITION_REPLY, PanTiltPositionReply),
        res!(ptz::SIG_PAN_TILT_POSITION_SPEED_REPLY, PanTiltPositionSpeedReply),
        // Lens
        res!(lens::SIG_ZOOM_SPEED_REPLY, ZoomSpeedReply),
        res!(lens::SIG_ZOOM_POSITION_REPLY, ZoomPositionReply),
        res!(lens::SIG_ZOOM_LEVEL_REPLY, ZoomLevelReply),
        res!(lens::SIG_FOCUS_SPEED_REPLY, FocusSpeedReply),
        res!(lens::SIG_FOCUS_POSITION_REPLY, FocusPositionReply),
        res!(lens::SIG_FOCUS_LEVEL_REPLY, FocusLevelReply),
        res!(lens::SIG_IRIS_POSITION_REPLY, IrisPositionReply),
        res!(lens::SIG_IRIS_LEVEL_REPLY, IrisLevelReply),
        res!(lens::SIG_LENS_INFO_CONTROL_REPLY, LensInfoControlReply),
        res!(lens::SIG_LENS_POSITION_REPLY, LensPositionReply),
        // Presets
        res!(preset::SIG_DONE_REPLY, PresetDoneReply),
        res!(preset::SIG_SPEED_REPLY, PresetSpeedReply),
        res!(preset::SIG_ENTRIES_REPLY, PresetEntriesReply),
        // Camera-side controls
        res!(cam::SIG_AUTOFOCUS_REPLY, AutoFocusReply),
        res!(cam::SIG_COLOR_BAR_REPLY, ColorBarReply),
        res!(cam::SIG_ND_FILTER_REPLY, NdFilterReply),
        res!(cam::SIG_GAIN_REPLY, GainReply),
        res!(cam::SIG_SHUTTER_REPLY, ShutterReply),
        res!(cam::SIG_WHITE_BALANCE_REPLY, WhiteBalanceModeReply),
        res!(cam::SIG_ONE_PUSH_WB_REPLY, OnePushWhiteBalanceReply),
        res!(cam::SIG_PEDESTAL_REPLY, PedestalReply),
        res!(cam::SIG_R_GAIN_REPLY, RGainReply),
        res!(cam::SIG_B_GAIN_REPLY, BGainReply),
        ResponseEntry {
            signature: cam::SIG_MODEL_REPLY,
            // Prototype with a one-character model so the factory's own
            // output satisfies the at-least-one-byte signature.
            make: || {
                Box::new(ModelReply {
                    model: "0".to_string(),
                })
            },
        },
    ]
}
