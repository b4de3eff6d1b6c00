//! Category enumerations for the source event tables.
//!
//! Source tables carry categories as free text. Each enum here parses the
//! site's labels case-insensitively; labels that are present but unknown map
//! to the enum's catch-all variant. Missing values are never parsed: the
//! adapter keeps them as `None`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercases, trims and collapses inner whitespace.
fn label_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Hospital discharge disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DischargeCategory {
    Expired,
    Hospice,
    SkilledNursingFacility,
    LongTermAcuteCare,
    AcuteRehab,
    AssistedLiving,
    Home,
    Other,
}

impl DischargeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DischargeCategory::Expired => "Expired",
            DischargeCategory::Hospice => "Hospice",
            DischargeCategory::SkilledNursingFacility => "Skilled Nursing Facility (SNF)",
            DischargeCategory::LongTermAcuteCare => "Long Term Care Hospital (LTACH)",
            DischargeCategory::AcuteRehab => "Acute Inpatient Rehab Facility",
            DischargeCategory::AssistedLiving => "Assisted Living",
            DischargeCategory::Home => "Home",
            DischargeCategory::Other => "Other",
        }
    }

    /// Post-acute facilities counted as "discharge to facility".
    pub fn is_facility(&self) -> bool {
        matches!(
            self,
            DischargeCategory::SkilledNursingFacility
                | DischargeCategory::LongTermAcuteCare
                | DischargeCategory::AcuteRehab
                | DischargeCategory::AssistedLiving
        )
    }
}

impl From<&str> for DischargeCategory {
    fn from(value: &str) -> Self {
        match label_key(value).as_str() {
            "expired" => DischargeCategory::Expired,
            "hospice" => DischargeCategory::Hospice,
            "skilled nursing facility (snf)" | "skilled nursing facility" | "snf" => {
                DischargeCategory::SkilledNursingFacility
            }
            "long term care hospital (ltach)"
            | "long term care hospital"
            | "long term acute care"
            | "ltach" => DischargeCategory::LongTermAcuteCare,
            "acute inpatient rehab facility" | "acute rehab" | "inpatient rehab" => {
                DischargeCategory::AcuteRehab
            }
            "assisted living" => DischargeCategory::AssistedLiving,
            "home" => DischargeCategory::Home,
            _ => DischargeCategory::Other,
        }
    }
}

impl fmt::Display for DischargeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ADT location category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationCategory {
    Icu,
    Ward,
    Stepdown,
    Ed,
    Procedural,
    Other,
}

impl LocationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationCategory::Icu => "icu",
            LocationCategory::Ward => "ward",
            LocationCategory::Stepdown => "stepdown",
            LocationCategory::Ed => "ed",
            LocationCategory::Procedural => "procedural",
            LocationCategory::Other => "other",
        }
    }

    /// Ward and stepdown beds count as a floor transfer destination.
    pub fn is_floor(&self) -> bool {
        matches!(self, LocationCategory::Ward | LocationCategory::Stepdown)
    }
}

impl From<&str> for LocationCategory {
    fn from(value: &str) -> Self {
        match label_key(value).as_str() {
            "icu" => LocationCategory::Icu,
            "ward" => LocationCategory::Ward,
            "stepdown" => LocationCategory::Stepdown,
            "ed" => LocationCategory::Ed,
            "procedural" => LocationCategory::Procedural,
            _ => LocationCategory::Other,
        }
    }
}

impl fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Code status category. Used only as an exclusion signal for trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeStatusCategory {
    Full,
    PresumedFull,
    Dnr,
    Dni,
    DnrDni,
    ComfortCare,
    Other,
}

impl CodeStatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeStatusCategory::Full => "Full",
            CodeStatusCategory::PresumedFull => "Presume Full",
            CodeStatusCategory::Dnr => "DNR",
            CodeStatusCategory::Dni => "DNI",
            CodeStatusCategory::DnrDni => "DNR/DNI",
            CodeStatusCategory::ComfortCare => "AND",
            CodeStatusCategory::Other => "Other",
        }
    }

    /// Statuses that rule a patient out of awakening and breathing trials.
    pub fn disqualifies_trials(&self) -> bool {
        matches!(
            self,
            CodeStatusCategory::Dni | CodeStatusCategory::DnrDni | CodeStatusCategory::ComfortCare
        )
    }
}

impl From<&str> for CodeStatusCategory {
    fn from(value: &str) -> Self {
        match label_key(value).as_str() {
            "full" | "full code" => CodeStatusCategory::Full,
            "presume full" | "presumed full" => CodeStatusCategory::PresumedFull,
            "dnr" | "udnr" => CodeStatusCategory::Dnr,
            "dni" => CodeStatusCategory::Dni,
            "dnr/dni" | "dnr-dni" | "dnr dni" => CodeStatusCategory::DnrDni,
            "and" | "comfort care" | "comfort measures only" => CodeStatusCategory::ComfortCare,
            _ => CodeStatusCategory::Other,
        }
    }
}

impl fmt::Display for CodeStatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Patient sex category, the input to ideal body weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SexCategory {
    Female,
    Male,
    Unknown,
}

impl SexCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SexCategory::Female => "Female",
            SexCategory::Male => "Male",
            SexCategory::Unknown => "Unknown",
        }
    }
}

impl From<&str> for SexCategory {
    fn from(value: &str) -> Self {
        match label_key(value).as_str() {
            "female" | "f" => SexCategory::Female,
            "male" | "m" => SexCategory::Male,
            _ => SexCategory::Unknown,
        }
    }
}

impl fmt::Display for SexCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Respiratory support device category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceCategory {
    /// Invasive mechanical ventilation.
    Imv,
    Nippv,
    Cpap,
    HighFlowNc,
    FaceMask,
    TracheostomyCollar,
    NasalCannula,
    RoomAir,
    Other,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Imv => "IMV",
            DeviceCategory::Nippv => "NIPPV",
            DeviceCategory::Cpap => "CPAP",
            DeviceCategory::HighFlowNc => "High Flow NC",
            DeviceCategory::FaceMask => "Face Mask",
            DeviceCategory::TracheostomyCollar => "Trach Collar",
            DeviceCategory::NasalCannula => "Nasal Cannula",
            DeviceCategory::RoomAir => "Room Air",
            DeviceCategory::Other => "Other",
        }
    }

    pub fn is_invasive(&self) -> bool {
        matches!(self, DeviceCategory::Imv)
    }
}

impl From<&str> for DeviceCategory {
    fn from(value: &str) -> Self {
        match label_key(value).as_str() {
            "imv" => DeviceCategory::Imv,
            "nippv" => DeviceCategory::Nippv,
            "cpap" => DeviceCategory::Cpap,
            "high flow nc" => DeviceCategory::HighFlowNc,
            "face mask" => DeviceCategory::FaceMask,
            "trach collar" => DeviceCategory::TracheostomyCollar,
            "nasal cannula" => DeviceCategory::NasalCannula,
            "room air" => DeviceCategory::RoomAir,
            _ => DeviceCategory::Other,
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ventilator mode category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModeCategory {
    AssistControlVolumeControl,
    PressureControl,
    PressureRegulatedVolumeControl,
    Simv,
    PressureSupportCpap,
    VolumeSupport,
    BlowBy,
    Other,
}

impl ModeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeCategory::AssistControlVolumeControl => "Assist Control-Volume Control",
            ModeCategory::PressureControl => "Pressure Control",
            ModeCategory::PressureRegulatedVolumeControl => "Pressure-Regulated Volume Control",
            ModeCategory::Simv => "SIMV",
            ModeCategory::PressureSupportCpap => "Pressure Support/CPAP",
            ModeCategory::VolumeSupport => "Volume Support",
            ModeCategory::BlowBy => "Blow by",
            ModeCategory::Other => "Other",
        }
    }

    /// Controlled modes: the lung-protective ventilation denominator and the
    /// breathing-trial starting state.
    pub fn is_controlled(&self) -> bool {
        matches!(
            self,
            ModeCategory::AssistControlVolumeControl
                | ModeCategory::PressureControl
                | ModeCategory::PressureRegulatedVolumeControl
        )
    }
}

impl From<&str> for ModeCategory {
    fn from(value: &str) -> Self {
        match label_key(value).as_str() {
            "assist control-volume control" => ModeCategory::AssistControlVolumeControl,
            "pressure control" => ModeCategory::PressureControl,
            "pressure-regulated volume control" => ModeCategory::PressureRegulatedVolumeControl,
            "simv" => ModeCategory::Simv,
            "pressure support/cpap" => ModeCategory::PressureSupportCpap,
            "volume support" => ModeCategory::VolumeSupport,
            "blow by" => ModeCategory::BlowBy,
            _ => ModeCategory::Other,
        }
    }
}

impl fmt::Display for ModeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Drug category for continuous infusions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrugCategory {
    Sedative,
    Paralytic,
}

/// Sedative class, used to tell complete cessation from sedative-only cessation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SedativeClass {
    Opioid,
    Propofol,
    Benzodiazepine,
}

/// Continuous medications tracked for the sedation trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Medication {
    Fentanyl,
    Hydromorphone,
    Morphine,
    Propofol,
    Lorazepam,
    Midazolam,
    Cisatracurium,
    Vecuronium,
    Rocuronium,
}

impl Medication {
    pub const ALL: [Medication; 9] = [
        Medication::Fentanyl,
        Medication::Hydromorphone,
        Medication::Morphine,
        Medication::Propofol,
        Medication::Lorazepam,
        Medication::Midazolam,
        Medication::Cisatracurium,
        Medication::Vecuronium,
        Medication::Rocuronium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Medication::Fentanyl => "fentanyl",
            Medication::Hydromorphone => "hydromorphone",
            Medication::Morphine => "morphine",
            Medication::Propofol => "propofol",
            Medication::Lorazepam => "lorazepam",
            Medication::Midazolam => "midazolam",
            Medication::Cisatracurium => "cisatracurium",
            Medication::Vecuronium => "vecuronium",
            Medication::Rocuronium => "rocuronium",
        }
    }

    pub fn category(&self) -> DrugCategory {
        match self {
            Medication::Cisatracurium | Medication::Vecuronium | Medication::Rocuronium => {
                DrugCategory::Paralytic
            }
            _ => DrugCategory::Sedative,
        }
    }

    /// Sedative class, `None` for paralytics.
    pub fn sedative_class(&self) -> Option<SedativeClass> {
        match self {
            Medication::Fentanyl | Medication::Hydromorphone | Medication::Morphine => {
                Some(SedativeClass::Opioid)
            }
            Medication::Propofol => Some(SedativeClass::Propofol),
            Medication::Lorazepam | Medication::Midazolam => Some(SedativeClass::Benzodiazepine),
            Medication::Cisatracurium | Medication::Vecuronium | Medication::Rocuronium => None,
        }
    }

    pub fn is_sedating(&self) -> bool {
        self.category() == DrugCategory::Sedative
    }
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Medication {
    type Err = String;

    /// Parse a `med_category` label; untracked medications are an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = label_key(s);
        Medication::ALL
            .into_iter()
            .find(|med| med.as_str() == key)
            .ok_or_else(|| format!("Untracked medication: {s}"))
    }
}
