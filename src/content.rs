use crate::models::{
    DeviceCategory, DeviceOption, DeviceType, Highlight, Location, PhoneLine, Testimonial,
};

pub const BUSINESS_NAME: &str = "PRC Repair";
pub const CONTACT_EMAIL: &str = "service@prcrepair.com.au";

pub fn testimonials() -> &'static [Testimonial] {
    &TESTIMONIALS
}

static TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        id: 1,
        name: "Sarah Mitchell",
        role: "Full-Stack Developer",
        company: "Melbourne, VIC",
        content: "Amazing service! They fixed my laptop's screen in just one day. Professional and affordable.",
        rating: 5,
        avatar_url: "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=64&h=64&fit=crop&crop=face",
    },
    Testimonial {
        id: 2,
        name: "Michael Chen",
        role: "Data Scientist",
        company: "Brisbane, QLD",
        content: "Recovered all my important files from a crashed hard drive. Couldn't be happier with the service.",
        rating: 5,
        avatar_url: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=64&h=64&fit=crop&crop=face",
    },
    Testimonial {
        id: 3,
        name: "Jennifer Rodriguez",
        role: "Software Engineer",
        company: "Sydney, NSW",
        content: "Fast, reliable, and honest. They explained everything clearly and the price was very reasonable.",
        rating: 5,
        avatar_url: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=64&h=64&fit=crop&crop=face",
    },
];

pub fn device_options(selected: &str) -> Vec<DeviceOption> {
    DeviceType::ALL
        .into_iter()
        .map(|device| DeviceOption {
            value: device.value(),
            label: device.label(),
            selected: device.value() == selected,
        })
        .collect()
}

pub fn device_catalog() -> Vec<DeviceCategory> {
    vec![
        DeviceCategory {
            title: "Mobile Phones",
            services: vec![
                "Charging ports",
                "Battery issues",
                "Camera repair",
                "Data recovery",
                "Software updates",
            ],
        },
        DeviceCategory {
            title: "Tablets",
            services: vec![
                "Screen replacements",
                "Charging problems",
                "Battery & motherboard issues",
            ],
        },
        DeviceCategory {
            title: "Laptops",
            services: vec![
                "Slow systems",
                "Virus removal",
                "Screen and battery replacements",
                "Data recovery and file restoration",
            ],
        },
    ]
}

pub fn highlights() -> Vec<Highlight> {
    vec![
        Highlight {
            title: "10+ Years of Repair Experience",
            description: "Hands-on expertise you can trust",
        },
        Highlight {
            title: "Honest Quotes",
            description: "Transparent pricing, no surprises",
        },
        Highlight {
            title: "Only High-Quality Parts Used",
            description: "Premium components for lasting repairs",
        },
        Highlight {
            title: "No Hidden Fees",
            description: "What you see is what you pay",
        },
        Highlight {
            title: "Fast Turnaround",
            description: "Get your device back quickly",
        },
        Highlight {
            title: "Expert Repairs",
            description: "Professional technicians, quality results",
        },
    ]
}

pub fn locations() -> Vec<Location> {
    vec![
        Location {
            address: "122 Queen St, St Marys NSW 2760, Australia",
            maps_url: "https://maps.google.com/?q=122%20Queen%20St%2C%20St%20Marys%20NSW%202760%2C%20Australia",
        },
        Location {
            address: "Kiosk 1/227 Railway Terrace, Schofields NSW 2762, Australia",
            maps_url: "https://maps.google.com/?q=Kiosk%201%2F227%20Railway%20Terrace%2C%20Schofields%20NSW%202762%2C%20Australia",
        },
    ]
}

pub fn phone_lines() -> Vec<PhoneLine> {
    vec![
        PhoneLine {
            display: "(02) 8678 3298",
            dial: "0286783298",
        },
        PhoneLine {
            display: "(02) 7252 7141",
            dial: "0272527141",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testimonials_are_ordered_and_rated_within_range() {
        let ids: Vec<u32> = testimonials().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(testimonials().iter().all(|t| (1..=5).contains(&t.rating)));
    }

    #[test]
    fn device_options_mark_only_the_selected_value() {
        let options = device_options("ipad");
        assert_eq!(options.len(), 6);
        let selected: Vec<&str> = options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.value)
            .collect();
        assert_eq!(selected, vec!["ipad"]);
        assert!(device_options("").iter().all(|option| !option.selected));
    }
}
