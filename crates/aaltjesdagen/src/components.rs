//! Content-type dispatch and typed views over Storyblok blocks.
//!
//! Every block a story carries declares its type in a `component` field,
//! exactly as authored in the CMS, including names with embedded spaces
//! ("Stallen fietsen"). The [`ComponentRegistry`] maps those names to the
//! renderer that knows how to present them; [`Block`] gives renderers a
//! typed view of the payload instead of poking at raw JSON.
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;

/// Renderer used for component types nobody registered.
///
/// Unknown types are expected: editors can add new components in the CMS
/// before the site knows about them, and that must never abort a build.
pub const FALLBACK_RENDERER: &str = "storyblok/ui/Unknown";

// Renderer groupings mirror how the components are organized on disk. The
// grouping is organizational only, the registry flattens them at startup.

const STRUCTURAL: &[(&str, &str)] = &[
    ("Page", "storyblok/structural/Page"),
    ("Grid", "storyblok/structural/Grid"),
    ("Gridmenu", "storyblok/structural/GridMenu"),
    ("BereikbaarheidGrid", "storyblok/structural/AccessibilityGrid"),
];

const UI: &[(&str, &str)] = &[
    ("Feature", "storyblok/ui/Feature"),
    ("Teaser", "storyblok/ui/Teaser"),
    ("Tussentekst", "storyblok/ui/SectionText"),
];

const SECTIONS: &[(&str, &str)] = &[
    ("hero", "storyblok/sections/Hero"),
    ("Intro", "storyblok/sections/Intro"),
    ("BelangrijkOmTeWeten", "storyblok/sections/ImportantInfo"),
];

const PROGRAM: &[(&str, &str)] = &[
    ("ProgrammaDag", "storyblok/features/program/DayProgram"),
    ("Programma Dag 1", "storyblok/features/program/DayProgram"),
    ("Programma dag 2", "storyblok/features/program/DayProgram"),
    ("Programma Dag 3", "storyblok/features/program/DayProgram"),
    ("ProgrammaADF", "storyblok/features/program/FestivalProgram"),
];

const ACCESSIBILITY: &[(&str, &str)] = &[
    ("BereikbaarHero", "storyblok/features/accessibility/Hero"),
    ("Stallen fietsen", "storyblok/features/accessibility/BicycleParking"),
    ("Parkeren Auto", "storyblok/features/accessibility/CarParking"),
    ("OpenbaarVervoer", "storyblok/features/accessibility/PublicTransport"),
    (
        "In en rondom de binnenstad",
        "storyblok/features/accessibility/CityAccess",
    ),
    ("parkeersectie", "storyblok/features/accessibility/ParkingSection"),
    ("EHBO-posten", "storyblok/features/accessibility/FirstAid"),
    ("toegankelijkheid", "storyblok/features/accessibility/AccessibilityInfo"),
];

const DEFAULT_GROUPS: &[&[(&str, &str)]] = &[STRUCTURAL, UI, SECTIONS, PROGRAM, ACCESSIBILITY];

/// Maps CMS component-type names to renderer identifiers.
///
/// Lookups are exact-string: no trimming, no case folding. Built once at
/// startup by flattening the groups above.
pub struct ComponentRegistry {
    map: FxHashMap<String, String>,
    fallback: String,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_GROUPS, FALLBACK_RENDERER)
    }
}

impl ComponentRegistry {
    pub fn new(groups: &[&[(&str, &str)]], fallback: &str) -> Self {
        let map = groups
            .iter()
            .flat_map(|group| group.iter())
            .map(|(component, renderer)| (component.to_string(), renderer.to_string()))
            .collect();

        Self {
            map,
            fallback: fallback.to_string(),
        }
    }

    /// Returns the renderer for a component type, or the fallback for
    /// anything unregistered. Never fails.
    pub fn resolve(&self, component: &str) -> &str {
        self.map
            .get(component)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn contains(&self, component: &str) -> bool {
        self.map.contains_key(component)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Reference to an uploaded Storyblok asset, feeds
/// [`storyblok_image`](crate::images::storyblok_image).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AssetRef {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub body: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GridBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub columns: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FeatureBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TeaserBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub headline: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SectionTextBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    /// Rich text, rendered by the renderer as-is.
    #[serde(default)]
    pub text: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HeroBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image: Option<AssetRef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct IntroBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImportantInfoBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DayProgramBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    /// Plain `YYYY-MM-DD` or Storyblok datetime string, formatted by
    /// [`dates`](crate::dates) at render time.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FestivalProgramBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub acts: Vec<Value>,
}

/// The bereikbaarheid feature blocks all share one text-plus-image shape.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InfoSectionBlock {
    #[serde(default, rename = "_uid")]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: Value,
    #[serde(default)]
    pub image: Option<AssetRef>,
}

/// Typed view of one content block, keyed by its `component` field.
///
/// Anything the site does not know ends up as [`Block::Unknown`] carrying
/// the raw payload, and renders through [`FALLBACK_RENDERER`].
#[derive(Clone, Debug)]
pub enum Block {
    Page(PageBlock),
    Grid(GridBlock),
    GridMenu(GridBlock),
    Feature(FeatureBlock),
    Teaser(TeaserBlock),
    SectionText(SectionTextBlock),
    Hero(HeroBlock),
    Intro(IntroBlock),
    ImportantInfo(ImportantInfoBlock),
    DayProgram(DayProgramBlock),
    FestivalProgram(FestivalProgramBlock),
    AccessibilitySection(InfoSectionBlock),
    Unknown { component: String, raw: Value },
}

impl Block {
    /// Builds a typed block from raw story content. Never fails: payloads
    /// that do not deserialize into their typed shape, and component types
    /// the site does not know, both become [`Block::Unknown`].
    pub fn from_value(value: Value) -> Block {
        let Some(component) = value.get("component").and_then(Value::as_str) else {
            return Block::Unknown {
                component: String::new(),
                raw: value,
            };
        };
        let component = component.to_string();

        match component.as_str() {
            "Page" => parse(value, &component, Block::Page),
            "Grid" => parse(value, &component, Block::Grid),
            "Gridmenu" | "BereikbaarheidGrid" => parse(value, &component, Block::GridMenu),
            "Feature" => parse(value, &component, Block::Feature),
            "Teaser" => parse(value, &component, Block::Teaser),
            "Tussentekst" => parse(value, &component, Block::SectionText),
            "hero" | "BereikbaarHero" => parse(value, &component, Block::Hero),
            "Intro" => parse(value, &component, Block::Intro),
            "BelangrijkOmTeWeten" => parse(value, &component, Block::ImportantInfo),
            "ProgrammaDag" | "Programma Dag 1" | "Programma dag 2" | "Programma Dag 3" => {
                parse(value, &component, Block::DayProgram)
            }
            "ProgrammaADF" => parse(value, &component, Block::FestivalProgram),
            "Stallen fietsen" | "Parkeren Auto" | "OpenbaarVervoer"
            | "In en rondom de binnenstad" | "parkeersectie" | "EHBO-posten"
            | "toegankelijkheid" => parse(value, &component, Block::AccessibilitySection),
            _ => Block::Unknown {
                component,
                raw: value,
            },
        }
    }

    pub fn uid(&self) -> Option<&str> {
        match self {
            Block::Page(block) => Some(&block.uid),
            Block::Grid(block) | Block::GridMenu(block) => Some(&block.uid),
            Block::Feature(block) => Some(&block.uid),
            Block::Teaser(block) => Some(&block.uid),
            Block::SectionText(block) => Some(&block.uid),
            Block::Hero(block) => Some(&block.uid),
            Block::Intro(block) => Some(&block.uid),
            Block::ImportantInfo(block) => Some(&block.uid),
            Block::DayProgram(block) => Some(&block.uid),
            Block::FestivalProgram(block) => Some(&block.uid),
            Block::AccessibilitySection(block) => Some(&block.uid),
            Block::Unknown { raw, .. } => raw.get("_uid").and_then(Value::as_str),
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(
    value: Value,
    component: &str,
    variant: impl FnOnce(T) -> Block,
) -> Block {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(block) => variant(block),
        Err(_) => Block::Unknown {
            component: component.to_string(),
            raw: value,
        },
    }
}
