use serde::{Deserialize, Serialize};

use crate::card_config::Role;

// Card variant, one per heat pump model diagram
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Lv,
    Lv12,
}

// Position on the diagram in percent of the image size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelKey {
    Outdoor,
    CurveCaption,
    Curve,
    Evap,
    Hp,
    Lp,
    TankCv,
    TankVv,
    CvForward,
    CvReturn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IconKey {
    CvPump,
    CvFlow,
    HpLoop,
    CompUnit,
    Defrost,
    Aux,
}

pub struct Layout {
    pub header: &'static str,
    pub labels: &'static [(LabelKey, Position)],
    pub icons: &'static [(IconKey, Position)],
}

const fn at(top: f64, left: f64) -> Position {
    Position {
        top,
        left,
        width: None,
    }
}

const fn sized(top: f64, left: f64, width: f64) -> Position {
    Position {
        top,
        left,
        width: Some(width),
    }
}

static LV_LAYOUT: Layout = Layout {
    header: "DVI LV Compact varmepumpe",
    labels: &[
        (LabelKey::Outdoor, at(11., 13.)),
        (LabelKey::CurveCaption, at(18., 50.)),
        (LabelKey::Curve, at(18., 68.)),
        (LabelKey::Evap, at(77., 16.)),
        (LabelKey::Hp, at(31., 43.5)),
        (LabelKey::Lp, at(31., 34.)),
        (LabelKey::TankCv, at(72.5, 61.)),
        (LabelKey::TankVv, at(33., 80.)),
        (LabelKey::CvForward, at(79.2, 73.)),
        (LabelKey::CvReturn, at(94., 73.)),
    ],
    icons: &[
        (IconKey::CvPump, sized(79.3, 88.8, 21.)),
        (IconKey::CvFlow, sized(89.95, 71.7, 14.2)),
        (IconKey::HpLoop, sized(63.75, 18.4, 33.9)),
        (IconKey::CompUnit, sized(63.75, 46., 21.3)),
        (IconKey::Defrost, at(85., 15.)),
        (IconKey::Aux, at(70., 69.)),
    ],
};

static LV12_LAYOUT: Layout = Layout {
    header: "DVI LV12 Compact varmepumpe",
    labels: &[
        (LabelKey::Outdoor, at(13., 13.)),
        (LabelKey::CurveCaption, at(13., 48.)),
        (LabelKey::Curve, at(13., 68.)),
        (LabelKey::Evap, at(77., 16.)),
        (LabelKey::Hp, at(31., 43.5)),
        (LabelKey::Lp, at(31., 34.)),
        (LabelKey::TankCv, at(72.5, 61.)),
        (LabelKey::TankVv, at(33., 85.)),
        (LabelKey::CvForward, at(77.4, 75.)),
        (LabelKey::CvReturn, at(96., 75.)),
    ],
    icons: &[
        (IconKey::CvPump, sized(78., 89., 21.)),
        (IconKey::CvFlow, sized(89.9, 71.8, 14.2)),
        (IconKey::HpLoop, sized(62.7, 18.4, 33.9)),
        (IconKey::CompUnit, sized(62.75, 46., 21.3)),
        (IconKey::Defrost, at(85., 15.)),
        (IconKey::Aux, at(70., 69.)),
    ],
};

impl Variant {
    pub fn key(self) -> &'static str {
        match self {
            Variant::Lv => "lv",
            Variant::Lv12 => "lv12",
        }
    }

    pub fn layout(self) -> &'static Layout {
        match self {
            Variant::Lv => &LV_LAYOUT,
            Variant::Lv12 => &LV12_LAYOUT,
        }
    }
}

impl LabelKey {
    // Entity whose state the label shows, the caption is static text
    pub fn role(self) -> Option<Role> {
        match self {
            LabelKey::Outdoor => Some(Role::OutdoorTemp),
            LabelKey::CurveCaption => None,
            LabelKey::Curve => Some(Role::CurveTemp),
            LabelKey::Evap => Some(Role::EvaporatorTemp),
            LabelKey::Hp => Some(Role::HpTemp),
            LabelKey::Lp => Some(Role::LpTemp),
            LabelKey::TankCv => Some(Role::StorageTankCv),
            LabelKey::TankVv => Some(Role::StorageTankVv),
            LabelKey::CvForward => Some(Role::CvForwardTemp),
            LabelKey::CvReturn => Some(Role::CvReturnTemp),
        }
    }
}

impl IconKey {
    // Entity whose state drives the icon and opens on click
    pub fn role(self) -> Role {
        match self {
            IconKey::CvPump | IconKey::CvFlow => Role::CvPumpIcon,
            IconKey::HpLoop | IconKey::CompUnit => Role::CompIcon,
            IconKey::Defrost => Role::DefrostIcon,
            IconKey::Aux => Role::AuxHeating,
        }
    }
}
