//! Closed choice enumerations stored as SMALLINT codes.
//!
//! Each enum has exactly one definition and is shared by every table that
//! uses it (`AssetType` is used by both assets and approval entries). The
//! database stores only the code; display labels belong to the presentation
//! layer. JSON uses the lower/snake-case variant name.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ChoiceCode;

macro_rules! define_choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        $(#[$meta])*
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the stored code.
            pub fn code(self) -> ChoiceCode {
                self as ChoiceCode
            }

            /// Look up a variant by its stored code.
            pub fn from_code(code: ChoiceCode) -> Option<Self> {
                match code {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for ChoiceCode {
            fn from(value: $name) -> Self {
                value as ChoiceCode
            }
        }

        impl TryFrom<ChoiceCode> for $name {
            type Error = CoreError;

            fn try_from(code: ChoiceCode) -> Result<Self, Self::Error> {
                Self::from_code(code).ok_or_else(|| {
                    CoreError::Validation(format!(
                        "invalid {} code: {code}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

define_choice_enum! {
    /// Top-level asset category.
    #[serde(rename_all = "lowercase")]
    AssetType {
        #[default]
        Server = 0,
        NetworkDevice = 1,
        StorageDevice = 2,
        SecurityDevice = 3,
        Software = 4,
    }
}

impl AssetType {
    /// Whether assets of this type carry a specialization record.
    pub fn has_specialization(self) -> bool {
        !matches!(self, AssetType::Software)
    }
}

define_choice_enum! {
    /// Operational status of an asset.
    #[serde(rename_all = "lowercase")]
    AssetStatus {
        #[default]
        Online = 0,
        Offline = 1,
        Unknown = 2,
        Faulty = 3,
        Standby = 4,
    }
}

define_choice_enum! {
    #[serde(rename_all = "lowercase")]
    ServerSubType {
        #[default]
        Pc = 0,
        Blade = 1,
        Minicomputer = 2,
    }
}

define_choice_enum! {
    /// How a server record entered the inventory.
    #[serde(rename_all = "lowercase")]
    CreationMode {
        #[default]
        Auto = 0,
        Manual = 1,
    }
}

define_choice_enum! {
    #[serde(rename_all = "snake_case")]
    NetworkDeviceSubType {
        #[default]
        Router = 0,
        Switch = 1,
        LoadBalancer = 2,
        Vpn = 3,
    }
}

define_choice_enum! {
    #[serde(rename_all = "snake_case")]
    StorageDeviceSubType {
        #[default]
        DiskArray = 0,
        NetworkStorage = 1,
        TapeLibrary = 2,
        TapeDrive = 3,
    }
}

define_choice_enum! {
    #[serde(rename_all = "snake_case")]
    SecurityDeviceSubType {
        #[default]
        Firewall = 0,
        IntrusionDetection = 1,
        InternetGateway = 2,
        BastionHost = 3,
    }
}

define_choice_enum! {
    #[serde(rename_all = "lowercase")]
    SoftwareSubType {
        #[default]
        Os = 0,
        Office = 1,
        Dev = 2,
        Application = 3,
    }
}

define_choice_enum! {
    /// Physical disk interface.
    #[serde(rename_all = "lowercase")]
    DiskInterface {
        Sata = 0,
        Sas = 1,
        Scsi = 2,
        Ssd = 3,
        #[default]
        Unknown = 4,
    }
}

define_choice_enum! {
    /// Category of an event log entry.
    #[serde(rename_all = "snake_case")]
    EventType {
        Other = 0,
        HardwareChange = 1,
        ComponentAdded = 2,
        Offline = 3,
        #[default]
        Online = 4,
        Maintenance = 5,
        Change = 6,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn codes_round_trip_for_every_variant() {
        for status in AssetStatus::ALL {
            assert_eq!(AssetStatus::from_code(status.code()), Some(*status));
        }
        for event in EventType::ALL {
            assert_eq!(EventType::try_from(event.code()).unwrap(), *event);
        }
    }

    #[test]
    fn status_codes_match_stored_values() {
        assert_eq!(AssetStatus::Online.code(), 0);
        assert_eq!(AssetStatus::Standby.code(), 4);
        assert_eq!(EventType::Online.code(), 4);
        assert_eq!(AssetType::Software.code(), 4);
    }

    #[test]
    fn unknown_code_is_a_validation_error() {
        assert_matches!(AssetType::try_from(9), Err(CoreError::Validation(msg)) if msg.contains("AssetType"));
        assert_eq!(DiskInterface::from_code(-1), None);
    }

    #[test]
    fn defaults() {
        assert_eq!(AssetType::default(), AssetType::Server);
        assert_eq!(AssetStatus::default(), AssetStatus::Online);
        assert_eq!(DiskInterface::default(), DiskInterface::Unknown);
        assert_eq!(EventType::default(), EventType::Online);
    }

    #[test]
    fn json_uses_variant_names() {
        assert_eq!(
            serde_json::to_string(&AssetType::NetworkDevice).unwrap(),
            "\"networkdevice\""
        );
        assert_eq!(
            serde_json::to_string(&EventType::HardwareChange).unwrap(),
            "\"hardware_change\""
        );
        let parsed: SecurityDeviceSubType = serde_json::from_str("\"bastion_host\"").unwrap();
        assert_eq!(parsed, SecurityDeviceSubType::BastionHost);
    }

    #[test]
    fn only_software_lacks_a_specialization() {
        let without: Vec<_> = AssetType::ALL
            .iter()
            .filter(|t| !t.has_specialization())
            .collect();
        assert_eq!(without, vec![&AssetType::Software]);
    }
}
