//! Abhay Kumar Gautam's portfolio page.
//!
//! The page is static: content lives in the tables below and is rendered by
//! the `portfolio.html` template.

use askama::Template;

pub const WHATSAPP_NUMBER: &str = "919140651620";
pub const EMAIL: &str = "abhay.gautam.art@gmail.com";
const GENERAL_ENQUIRY: &str = "Hi, I'd like to know more about your artwork.";

pub struct Artwork {
    pub src: &'static str,
    pub title: &'static str,
    pub width: u32,
    pub height: u32,
}

pub struct Mockup {
    pub src: &'static str,
    pub title: &'static str,
}

pub struct Milestone {
    pub label: &'static str,
    pub text: &'static str,
}

pub struct Offering {
    pub title: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    pub cta: &'static str,
    pub whatsapp_message: &'static str,
}

pub const ARTWORKS: &[Artwork] = &[
    Artwork { src: "/images/artwork/polo-match.jpg", title: "Polo Match", width: 1200, height: 800 },
    Artwork { src: "/images/artwork/surreal-bells.jpg", title: "Surreal Bells", width: 1200, height: 900 },
    Artwork { src: "/images/artwork/woman-reading.jpg", title: "Woman Reading", width: 1200, height: 1500 },
    Artwork { src: "/images/artwork/rainy-park.jpg", title: "Rainy Park", width: 1200, height: 800 },
    Artwork { src: "/images/artwork/stormy-sea.jpg", title: "Stormy Sea", width: 1200, height: 800 },
    Artwork { src: "/images/artwork/sunset-boat.jpg", title: "Sunset Boat", width: 1200, height: 900 },
    Artwork { src: "/images/mockups/polo-match--in-gallery-dark.jpg", title: "Polo Match, Gallery View", width: 1200, height: 800 },
    Artwork { src: "/images/mockups/surreal-bells--in-gallery-dark.jpg", title: "Surreal Bells, Gallery View", width: 1200, height: 800 },
    Artwork { src: "/images/mockups/woman-reading--in-luxury-apartment.jpg", title: "Woman Reading, In Situ", width: 1200, height: 800 },
];

pub const MOCKUPS: &[Mockup] = &[
    Mockup { src: "/images/mockups/polo-match--in-gallery-dark.jpg", title: "Polo Match in a gallery setting" },
    Mockup { src: "/images/mockups/stormy-sea--in-luxury-apartment.jpg", title: "Stormy Sea in a luxury apartment" },
    Mockup { src: "/images/mockups/woman-reading--in-luxury-apartment.jpg", title: "Woman Reading in a luxury apartment" },
    Mockup { src: "/images/mockups/rainy-park--in-modern-living.jpg", title: "Rainy Park in a modern living room" },
];

pub const JOURNEY: &[Milestone] = &[
    Milestone { label: "Bareilly", text: "Born in a small town in rural Uttar Pradesh. A strict father, a school principal. Lost his mother young. Raised his siblings." },
    Milestone { label: "Art School", text: "Found refuge in art, not as escape but as translation. Every joy, every grief became pigment on canvas, form in clay." },
    Milestone { label: "Doctorate", text: "Studied art formally and earned a doctorate. Not for credentials, but to understand the thing that understood him." },
    Milestone { label: "30+ Years", text: "Taught at BN SD College, Kanpur. Shaped generations of young artists. Gave them technique. Gave them permission." },
    Milestone { label: "Now", text: "Retired from the classroom, not from the canvas. Returning to his own work, making art the way it was meant to be made. By hand." },
];

pub const OFFERINGS: &[Offering] = &[
    Offering {
        title: "Original Paintings",
        price: "₹15,000 to ₹5,00,000",
        description: "One-of-a-kind works in oil, watercolor, and mixed media. Each piece is unique and comes with a certificate of authenticity.",
        cta: "Inquire via WhatsApp",
        whatsapp_message: "Hi, I'm interested in purchasing an original painting by Abhay Kumar Gautam.",
    },
    Offering {
        title: "Limited Edition Prints",
        price: "₹2,999 to ₹14,999",
        description: "Museum-quality giclée prints on archival paper. Numbered and signed. Editions of 50. Available framed or unframed.",
        cta: "Order a Print",
        whatsapp_message: "Hi, I'd like to order a limited edition print.",
    },
    Offering {
        title: "Commission a Painting",
        price: "₹25,000 to ₹3,00,000",
        description: "A bespoke painting created to your vision: horses, landscapes, portraits, or abstract. Includes concept sketch and revisions.",
        cta: "Start a Commission",
        whatsapp_message: "Hi, I'd like to commission a custom painting.",
    },
    Offering {
        title: "Art Workshops",
        price: "₹3,999 to ₹9,999",
        description: "Learn from a master with 30+ years of teaching. Oil painting, watercolor, and sculpture. In-person (Kanpur) or online.",
        cta: "Join a Workshop",
        whatsapp_message: "Hi, I'm interested in attending an art workshop.",
    },
];

/// `wa.me` deep link that opens a chat prefilled with `message`.
pub fn whatsapp_link(message: &str) -> String {
    let base = format!("https://wa.me/{WHATSAPP_NUMBER}");
    match reqwest::Url::parse_with_params(&base, &[("text", message)]) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "could not build WhatsApp link");
            base
        }
    }
}

impl Offering {
    pub fn whatsapp_link(&self) -> String {
        whatsapp_link(self.whatsapp_message)
    }
}

#[derive(Template)]
#[template(path = "portfolio.html")]
pub struct PortfolioPage {
    pub artworks: &'static [Artwork],
    pub mockups: &'static [Mockup],
    pub journey: &'static [Milestone],
    pub offerings: &'static [Offering],
    pub contact_link: String,
    pub email: &'static str,
}

impl PortfolioPage {
    pub fn new() -> Self {
        Self {
            artworks: ARTWORKS,
            mockups: MOCKUPS,
            journey: JOURNEY,
            offerings: OFFERINGS,
            contact_link: whatsapp_link(GENERAL_ENQUIRY),
            email: EMAIL,
        }
    }
}

impl Default for PortfolioPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_link_encodes_message() {
        let link = whatsapp_link("Hi, I'd like a print & frame");
        assert!(link.starts_with("https://wa.me/919140651620?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("%26"));
    }

    #[test]
    fn page_lists_every_work_and_offering() {
        let page = PortfolioPage::new().render().unwrap();
        for art in ARTWORKS {
            assert!(page.contains(art.title), "{}", art.title);
        }
        for offer in OFFERINGS {
            assert!(page.contains(offer.cta), "{}", offer.cta);
        }
        for step in JOURNEY {
            assert!(page.contains(step.label), "{}", step.label);
        }
        assert!(page.contains(EMAIL));
    }
}
