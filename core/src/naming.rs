//! Deterministic identity synthesis using curated name lists.
//!
//! Display names follow segment conventions: SMB stores trade under a
//! person's name, Mid-Market under a possessive shop name or a company
//! name, Enterprise under a company name with a corporate suffix. The
//! storefront slug/domain is derived from the display name.
//! All generation is deterministic (same RNG seed = same identities).

use crate::rng::GenRng;
use crate::types::Segment;

pub struct Naming;

impl Naming {
    /// Segment-appropriate display name.
    pub fn display_name(segment: Segment, rng: &mut GenRng) -> String {
        match segment {
            Segment::Smb => Self::person_name(rng),
            Segment::MidMarket => {
                if rng.chance(0.5) {
                    let descriptor = rng.pick(&["Studio", "Shop", "Solutions"]);
                    format!("{}'s {}", Self::first_name(rng), descriptor)
                } else {
                    Self::company_name(rng)
                }
            }
            Segment::Enterprise => {
                let suffix = rng.pick(&["Inc.", "LLC", "Group", "Solutions", "Systems"]);
                format!("{} {}", Self::company_name(rng), suffix)
            }
        }
    }

    pub fn person_name(rng: &mut GenRng) -> String {
        format!("{} {}", Self::first_name(rng), Self::last_name(rng))
    }

    /// Company name without a corporate suffix: either
    /// "Prefix Industry" or "LastName Industry".
    pub fn company_name(rng: &mut GenRng) -> String {
        if rng.chance(0.5) {
            format!("{} {}", rng.pick(COMPANY_PREFIXES), rng.pick(INDUSTRIES))
        } else {
            format!("{} {}", Self::last_name(rng), rng.pick(INDUSTRIES))
        }
    }

    pub fn first_name(rng: &mut GenRng) -> &'static str {
        *rng.pick(FIRST_NAMES)
    }

    pub fn last_name(rng: &mut GenRng) -> &'static str {
        *rng.pick(LAST_NAMES)
    }

    /// Contact email, independent of the display name.
    pub fn email(rng: &mut GenRng) -> String {
        let first = Self::first_name(rng).to_lowercase();
        let last = Self::last_name(rng).to_lowercase();
        let provider = rng.pick(MAIL_PROVIDERS);
        if rng.chance(0.5) {
            format!("{}.{}{}@{}", first, last, rng.int_in(1, 99), provider)
        } else {
            format!("{}.{}@{}", first, last, provider)
        }
    }

    /// Single-line mailing address.
    pub fn mailing_address(rng: &mut GenRng) -> String {
        let number = rng.int_in(10, 9999);
        let street = rng.pick(STREETS);
        let kind = rng.pick(STREET_KINDS);
        let (city, state) = rng.pick(CITIES);
        let zip = rng.int_in(10000, 99999);
        format!("{number} {street} {kind}, {city}, {state} {zip}")
    }

    /// Storefront slug and domain from a display name.
    pub fn store_identity(name: &str, domain_suffix: &str) -> (String, String) {
        let slug = slugify(name);
        let domain = format!("{slug}.{domain_suffix}");
        (slug, domain)
    }
}

/// URL-safe slug: lowercase, drop everything outside word chars,
/// whitespace and hyphens, then collapse separator runs to single
/// hyphens with no leading or trailing hyphen.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_separator = !slug.is_empty();
        } else if c.is_alphanumeric() {
            if pending_separator {
                slug.push('-');
                pending_separator = false;
            }
            slug.push(c);
        }
        // Everything else (punctuation, apostrophes) is dropped.
    }
    slug
}

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda",
    "William", "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
    "Thomas", "Sarah", "Charles", "Karen", "Christopher", "Lisa", "Daniel", "Nancy",
    "Matthew", "Betty", "Anthony", "Margaret", "Mark", "Sandra", "Donald", "Ashley",
    "Steven", "Kimberly", "Andrew", "Emily", "Paul", "Donna", "Joshua", "Michelle",
    "Kenneth", "Carol", "Kevin", "Amanda", "Brian", "Dorothy", "George", "Melissa",
    "Diego", "Amara", "Wei", "Priya", "Tomas", "Ingrid", "Kenji", "Fatima",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
    "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker",
    "Young", "Allen", "King", "Wright", "Scott", "Torres", "Nguyen", "Hill",
    "Flores", "Green", "Adams", "Nelson", "Baker", "Hall", "Rivera", "Campbell",
    "Patel", "Kim", "Chen", "Silva", "Tran", "Murphy", "O'Brien", "Schmidt",
];

const COMPANY_PREFIXES: &[&str] = &[
    "Premier", "Elite", "First", "Superior", "Quality", "Advanced", "Reliable",
    "Trusted", "Precision", "Metro", "City", "Valley", "Coastal", "Central",
    "United", "National", "Global", "Prime", "Summit", "Northern",
];

const INDUSTRIES: &[&str] = &[
    "Apparel", "Outfitters", "Goods", "Trading", "Supply", "Roasters", "Provisions",
    "Botanicals", "Interiors", "Crafts", "Home", "Labs", "Collective", "Market",
    "Press", "Paperworks", "Kitchenware", "Leatherworks", "Candles", "Gifts",
];

const MAIL_PROVIDERS: &[&str] = &["gmail.com", "yahoo.com", "outlook.com", "hotmail.com"];

const STREETS: &[&str] = &[
    "Oak", "Maple", "Cedar", "Pine", "Elm", "Washington", "Lake", "Hill",
    "Sunset", "River", "Park", "Main", "Church", "Spring", "Highland", "Willow",
];

const STREET_KINDS: &[&str] = &["St", "Ave", "Blvd", "Dr", "Ln", "Rd"];

const CITIES: &[(&str, &str)] = &[
    ("New York", "NY"),
    ("Los Angeles", "CA"),
    ("Chicago", "IL"),
    ("Houston", "TX"),
    ("Phoenix", "AZ"),
    ("Philadelphia", "PA"),
    ("San Antonio", "TX"),
    ("San Diego", "CA"),
    ("Dallas", "TX"),
    ("Austin", "TX"),
    ("Seattle", "WA"),
    ("Denver", "CO"),
    ("Boston", "MA"),
    ("Portland", "OR"),
    ("Atlanta", "GA"),
    ("Miami", "FL"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators_and_punctuation() {
        assert_eq!(slugify("Maria's Studio"), "marias-studio");
        assert_eq!(slugify("  Premier   Goods  "), "premier-goods");
        assert_eq!(slugify("O'Brien_Trading - Co."), "obrien-trading-co");
        assert_eq!(slugify("Acme Inc."), "acme-inc");
    }

    #[test]
    fn name_generation_is_deterministic() {
        let mut a = GenRng::new(12345);
        let mut b = GenRng::new(12345);
        for segment in Segment::ALL {
            assert_eq!(
                Naming::display_name(segment, &mut a),
                Naming::display_name(segment, &mut b),
            );
        }
    }

    #[test]
    fn enterprise_names_carry_corporate_suffix() {
        let mut rng = GenRng::new(7);
        for _ in 0..50 {
            let name = Naming::display_name(Segment::Enterprise, &mut rng);
            let has_suffix = ["Inc.", "LLC", "Group", "Solutions", "Systems"]
                .iter()
                .any(|s| name.ends_with(s));
            assert!(has_suffix, "missing corporate suffix: {name}");
        }
    }

    #[test]
    fn store_identity_appends_domain_suffix() {
        let (slug, domain) = Naming::store_identity("Valley Roasters LLC", "hopify.com");
        assert_eq!(slug, "valley-roasters-llc");
        assert_eq!(domain, "valley-roasters-llc.hopify.com");
    }
}
