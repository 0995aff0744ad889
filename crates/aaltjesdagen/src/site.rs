//! Site-wide constants: metadata, navigation, and external links.
//!
//! Central source of truth shared by the header, footer, and SEO tags.

pub struct SiteInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub city: &'static str,
    pub region: &'static str,
    pub country: &'static str,
}

pub const SITE: SiteInfo = SiteInfo {
    name: "Aaltjesdagen",
    description: "Het grootste evenement van Harderwijk! Kom en geniet van muziek, cultuur en gezelligheid tijdens de jaarlijkse Aaltjesdagen.",
    email: "info@aaltjesdagen.nl",
    phone: "+31 (0)341 123 456",
    city: "Harderwijk",
    region: "Gelderland",
    country: "Nederland",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
}

/// Main navigation, used by both the header and the footer.
pub const NAVIGATION: &[NavItem] = &[
    NavItem { name: "Home", href: "/" },
    NavItem { name: "Bereikbaarheid", href: "/bereikbaarheid" },
    NavItem { name: "ADF Muziekfestival", href: "/adf-muziekfestival" },
    NavItem { name: "Braderie", href: "/braderie" },
    NavItem { name: "Salsa", href: "/salsa" },
    NavItem { name: "Sponsoring", href: "/sponsoring" },
    NavItem { name: "Vacatures", href: "/vacatures" },
    NavItem { name: "Contact", href: "/contact" },
];

pub const LEGAL_LINKS: &[NavItem] = &[
    NavItem { name: "Privacy Policy", href: "/privacy" },
    NavItem { name: "Cookie Settings", href: "/cookies" },
    NavItem { name: "Algemene Voorwaarden", href: "/voorwaarden" },
];

pub struct SocialLink {
    pub platform: &'static str,
    pub href: &'static str,
    pub aria_label: &'static str,
}

pub const SOCIAL_LINKS: &[SocialLink] = &[
    SocialLink {
        platform: "Facebook",
        href: "https://facebook.com/aaltjesdagen",
        aria_label: "Volg ons op Facebook",
    },
    SocialLink {
        platform: "Instagram",
        href: "https://instagram.com/aaltjesdagen",
        aria_label: "Volg ons op Instagram",
    },
    SocialLink {
        platform: "Twitter",
        href: "https://twitter.com/aaltjesdagen",
        aria_label: "Volg ons op Twitter",
    },
];

/// Public base URL of the deployed site, e.g. `https://aaltjesdagen.nl`.
///
/// Read from the environment at call time so local builds without it still
/// work; canonical URL generation is skipped when it is unset.
pub fn site_url() -> Option<String> {
    std::env::var("SITE_URL").ok().filter(|url| !url.is_empty())
}
