use std::{fmt, str::FromStr};

use serde::Serialize;

pub const STATUS_PENDING: &str = "pending";

pub const BOOKINGS_TABLE: &str = "bookings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Iphone,
    Android,
    Ipad,
    Tablet,
    Laptop,
    Other,
}

impl DeviceType {
    pub const ALL: [DeviceType; 6] = [
        DeviceType::Iphone,
        DeviceType::Android,
        DeviceType::Ipad,
        DeviceType::Tablet,
        DeviceType::Laptop,
        DeviceType::Other,
    ];

    pub fn value(self) -> &'static str {
        match self {
            DeviceType::Iphone => "iphone",
            DeviceType::Android => "android",
            DeviceType::Ipad => "ipad",
            DeviceType::Tablet => "tablet",
            DeviceType::Laptop => "laptop",
            DeviceType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeviceType::Iphone => "iPhone",
            DeviceType::Android => "Android Phone",
            DeviceType::Ipad => "iPad",
            DeviceType::Tablet => "Android Tablet",
            DeviceType::Laptop => "Laptop",
            DeviceType::Other => "Other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device type `{0}`")]
pub struct UnknownDeviceType(pub String);

impl FromStr for DeviceType {
    type Err = UnknownDeviceType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DeviceType::ALL
            .into_iter()
            .find(|device| device.value() == value)
            .ok_or_else(|| UnknownDeviceType(value.to_string()))
    }
}

/// Row payload sent to the `bookings` table. `id` and `created_at` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBooking {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub device_type: String,
    pub issue_description: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Testimonial {
    pub id: u32,
    pub name: &'static str,
    pub role: &'static str,
    pub company: &'static str,
    pub content: &'static str,
    pub rating: u8,
    pub avatar_url: &'static str,
}

#[derive(Debug, Clone)]
pub struct DeviceCategory {
    pub title: &'static str,
    pub services: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Highlight {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct Location {
    pub address: &'static str,
    pub maps_url: &'static str,
}

#[derive(Debug, Clone)]
pub struct PhoneLine {
    pub display: &'static str,
    pub dial: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_parses_every_option_value() {
        for device in DeviceType::ALL {
            assert_eq!(device.value().parse::<DeviceType>(), Ok(device));
        }
    }

    #[test]
    fn device_type_rejects_labels_and_unknown_values() {
        assert!("iPhone".parse::<DeviceType>().is_err());
        assert!("".parse::<DeviceType>().is_err());
        assert!("watch".parse::<DeviceType>().is_err());
    }

    #[test]
    fn new_booking_serializes_storage_keys() {
        let booking = NewBooking {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "0400 000 000".to_string(),
            device_type: "laptop".to_string(),
            issue_description: "Fan noise".to_string(),
            status: STATUS_PENDING,
        };
        let value = serde_json::to_value(&booking).expect("serialize");
        let object = value.as_object().expect("object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "device_type",
                "email",
                "full_name",
                "issue_description",
                "phone",
                "status"
            ]
        );
        assert_eq!(object["status"], "pending");
    }
}
