use serde::{Deserialize, Deserializer, Serialize};

/// Rating given to every power stat of a newly created hero.
pub const DEFAULT_POWERSTAT: i32 = 50;

/// Marker used for descriptive fields nobody filled in.
pub const PLACEHOLDER: &str = "-";

/// Publisher label for heroes created in-session without one.
pub const DEFAULT_PUBLISHER: &str = "Custom";

pub const DEFAULT_ALIGNMENT: &str = "good";

pub const NO_ALTER_EGOS: &str = "No alter egos found.";

/// Image used for all four resolutions when a created hero has no image URL.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/256x384/9c27b0/ffffff?text=Hero";

/// The remote dataset sends `null` for plenty of fields we model as plain
/// values; treat those the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct Powerstats {
    #[serde(deserialize_with = "null_as_default")]
    pub intelligence: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub strength: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub speed: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub durability: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub power: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub combat: i32,
}

impl Powerstats {
    /// Every stat set to the same rating
    pub fn uniform(value: i32) -> Self {
        Self {
            intelligence: value,
            strength: value,
            speed: value,
            durability: value,
            power: value,
            combat: value,
        }
    }

    fn values(&self) -> [i32; 6] {
        [
            self.intelligence,
            self.strength,
            self.speed,
            self.durability,
            self.power,
            self.combat,
        ]
    }

    pub fn total(&self) -> i32 {
        self.values().iter().sum()
    }

    pub fn average(&self) -> f64 {
        f64::from(self.total()) / 6.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default, rename_all = "camelCase")]
pub struct Biography {
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alter_egos: String,
    #[serde(deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub place_of_birth: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_appearance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publisher: String,
    // Free-form in the dataset ("good", "bad", "neutral", "-")
    #[serde(deserialize_with = "null_as_default")]
    pub alignment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default, rename_all = "camelCase")]
pub struct Appearance {
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
    pub race: Option<String>,
    /// One entry per unit system, e.g. `["6'3", "191 cm"]`
    #[serde(deserialize_with = "null_as_default")]
    pub height: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub weight: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub eye_color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hair_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct Work {
    #[serde(deserialize_with = "null_as_default")]
    pub occupation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub base: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default, rename_all = "camelCase")]
pub struct Connections {
    #[serde(deserialize_with = "null_as_default")]
    pub group_affiliation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub relatives: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct HeroImages {
    #[serde(deserialize_with = "null_as_default")]
    pub xs: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sm: String,
    #[serde(deserialize_with = "null_as_default")]
    pub md: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lg: String,
}

impl HeroImages {
    /// Same URL for every resolution
    pub fn all(url: &str) -> Self {
        Self {
            xs: url.to_string(),
            sm: url.to_string(),
            md: url.to_string(),
            lg: url.to_string(),
        }
    }
}

/// A catalog entry. Remote and locally created heroes share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Hero {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub powerstats: Powerstats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub biography: Biography,
    #[serde(default, deserialize_with = "null_as_default")]
    pub appearance: Appearance,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work: Work,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: Connections,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: HeroImages,
}

impl Hero {
    /// Build a complete hero from creation input, filling every field the
    /// input doesn't carry with the catalog defaults.
    pub fn from_create(id: i64, input: HeroCreate) -> Self {
        let HeroCreate {
            name,
            publisher,
            occupation,
            first_appearance,
            image_url,
        } = input;

        let image_url = non_empty(image_url).unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

        Self {
            id,
            powerstats: Powerstats::uniform(DEFAULT_POWERSTAT),
            biography: Biography {
                full_name: name.clone(),
                alter_egos: NO_ALTER_EGOS.to_string(),
                aliases: Vec::new(),
                place_of_birth: PLACEHOLDER.to_string(),
                first_appearance: non_empty(first_appearance)
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                publisher: non_empty(publisher).unwrap_or_else(|| DEFAULT_PUBLISHER.to_string()),
                alignment: DEFAULT_ALIGNMENT.to_string(),
            },
            appearance: Appearance {
                gender: PLACEHOLDER.to_string(),
                race: None,
                height: vec![PLACEHOLDER.to_string()],
                weight: vec![PLACEHOLDER.to_string()],
                eye_color: PLACEHOLDER.to_string(),
                hair_color: PLACEHOLDER.to_string(),
            },
            work: Work {
                occupation: non_empty(occupation).unwrap_or_else(|| PLACEHOLDER.to_string()),
                base: PLACEHOLDER.to_string(),
            },
            connections: Connections {
                group_affiliation: PLACEHOLDER.to_string(),
                relatives: PLACEHOLDER.to_string(),
            },
            images: HeroImages::all(&image_url),
            name,
        }
    }

    /// Shallow merge: each supplied section replaces the current one wholesale.
    /// The id is never touched.
    pub fn apply_patch(&mut self, patch: HeroPatch) {
        let HeroPatch {
            name,
            powerstats,
            biography,
            appearance,
            work,
            connections,
            images,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(powerstats) = powerstats {
            self.powerstats = powerstats;
        }
        if let Some(biography) = biography {
            self.biography = biography;
        }
        if let Some(appearance) = appearance {
            self.appearance = appearance;
        }
        if let Some(work) = work {
            self.work = work;
        }
        if let Some(connections) = connections {
            self.connections = connections;
        }
        if let Some(images) = images {
            self.images = images;
        }
    }

    pub fn publisher(&self) -> &str {
        &self.biography.publisher
    }
}

/// Input for creating a hero. Only the name is required; form validation
/// happens before this reaches the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct HeroCreate {
    pub name: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub first_appearance: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl HeroCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.occupation = Some(occupation.into());
        self
    }

    pub fn with_first_appearance(mut self, first_appearance: impl Into<String>) -> Self {
        self.first_appearance = Some(first_appearance.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Partial update. Omitted sections keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct HeroPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub powerstats: Option<Powerstats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<Biography>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<Appearance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<Work>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<Connections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<HeroImages>,
}

impl HeroPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Optional form inputs arrive as empty strings as often as they arrive missing.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET_ENTRY: &str = r#"{
        "id": 70,
        "name": "Batman",
        "slug": "70-batman",
        "powerstats": {"intelligence": 100, "strength": 26, "speed": 27, "durability": 50, "power": 47, "combat": 100},
        "appearance": {"gender": "Male", "race": "Human", "height": ["6'2", "188 cm"], "weight": ["210 lb", "95 kg"], "eyeColor": "blue", "hairColor": "black"},
        "biography": {"fullName": "Bruce Wayne", "alterEgos": "No alter egos found.", "aliases": ["Insider", "Matches Malone"], "placeOfBirth": "Crest Hill, Bristol Township; Gotham County", "firstAppearance": "Detective Comics #27", "publisher": "DC Comics", "alignment": "good"},
        "work": {"occupation": "Businessman", "base": "Batcave, Stately Wayne Manor, Gotham City; Hall of Justice, Justice League Watchtower"},
        "connections": {"groupAffiliation": "Batman Family, Batman Incorporated, Justice League", "relatives": "Damian Wayne (son)"},
        "images": {"xs": "https://cdn/xs/70-batman.jpg", "sm": "https://cdn/sm/70-batman.jpg", "md": "https://cdn/md/70-batman.jpg", "lg": "https://cdn/lg/70-batman.jpg"}
    }"#;

    #[test]
    fn test_parse_dataset_entry() {
        let hero: Hero = serde_json::from_str(DATASET_ENTRY).unwrap();
        assert_eq!(hero.id, 70);
        assert_eq!(hero.biography.full_name, "Bruce Wayne");
        assert_eq!(hero.biography.aliases, vec!["Insider", "Matches Malone"]);
        assert_eq!(hero.appearance.height, vec!["6'2", "188 cm"]);
        assert_eq!(hero.appearance.race.as_deref(), Some("Human"));
        assert_eq!(
            hero.connections.group_affiliation,
            "Batman Family, Batman Incorporated, Justice League"
        );
        assert_eq!(hero.powerstats.total(), 350);
    }

    #[test]
    fn test_parse_sparse_entry() {
        let hero: Hero =
            serde_json::from_str(r#"{"id": 1, "name": "Superman", "biography": {"publisher": "DC Comics"}}"#)
                .unwrap();
        assert_eq!(hero.publisher(), "DC Comics");
        assert_eq!(hero.biography.full_name, "");
        assert_eq!(hero.powerstats, Powerstats::default());
        assert!(hero.appearance.race.is_none());
    }

    #[test]
    fn test_parse_nulls() {
        let hero: Hero = serde_json::from_str(
            r#"{"id": 2, "name": "Abin Sur", "appearance": {"race": null, "gender": null}, "biography": {"publisher": null, "aliases": null}, "images": null}"#,
        )
        .unwrap();
        assert!(hero.appearance.race.is_none());
        assert_eq!(hero.appearance.gender, "");
        assert_eq!(hero.publisher(), "");
        assert!(hero.biography.aliases.is_empty());
        assert_eq!(hero.images, HeroImages::default());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        assert!(serde_json::from_str::<Hero>(r#"{"id": 3}"#).is_err());
    }

    #[test]
    fn test_serialize_uses_dataset_names() {
        let hero = Hero::from_create(9, HeroCreate::new("Flash"));
        let json = serde_json::to_value(&hero).unwrap();
        assert_eq!(json["biography"]["fullName"], "Flash");
        assert_eq!(json["biography"]["alterEgos"], NO_ALTER_EGOS);
        assert_eq!(json["appearance"]["eyeColor"], PLACEHOLDER);
        assert!(json["appearance"]["race"].is_null());
        assert_eq!(json["connections"]["groupAffiliation"], PLACEHOLDER);
    }

    #[test]
    fn test_from_create_defaults() {
        let hero = Hero::from_create(7, HeroCreate::new("Flash").with_publisher("DC Comics"));

        assert_eq!(hero.id, 7);
        assert_eq!(hero.name, "Flash");
        assert_eq!(hero.biography.full_name, "Flash");
        assert_eq!(hero.biography.publisher, "DC Comics");
        assert_eq!(hero.biography.alignment, DEFAULT_ALIGNMENT);
        assert_eq!(hero.biography.place_of_birth, PLACEHOLDER);
        assert_eq!(hero.biography.first_appearance, PLACEHOLDER);
        assert!(hero.biography.aliases.is_empty());
        assert_eq!(hero.powerstats, Powerstats::uniform(DEFAULT_POWERSTAT));
        assert_eq!(hero.work.occupation, PLACEHOLDER);
        assert_eq!(hero.appearance.height, vec![PLACEHOLDER]);
        assert_eq!(hero.images, HeroImages::all(PLACEHOLDER_IMAGE_URL));
    }

    #[test]
    fn test_from_create_uses_supplied_fields() {
        let input = HeroCreate::new("Flash")
            .with_occupation("Forensic Scientist")
            .with_first_appearance("Showcase #4")
            .with_image_url("https://img/flash.png");
        let hero = Hero::from_create(1, input);

        assert_eq!(hero.biography.publisher, DEFAULT_PUBLISHER);
        assert_eq!(hero.work.occupation, "Forensic Scientist");
        assert_eq!(hero.biography.first_appearance, "Showcase #4");
        assert_eq!(hero.images.xs, "https://img/flash.png");
        assert_eq!(hero.images.lg, "https://img/flash.png");
    }

    #[test]
    fn test_from_create_empty_strings_fall_back() {
        let input = HeroCreate::new("Flash").with_publisher("").with_image_url("");
        let hero = Hero::from_create(1, input);
        assert_eq!(hero.biography.publisher, DEFAULT_PUBLISHER);
        assert_eq!(hero.images.md, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_apply_patch_is_shallow() {
        let original: Hero = serde_json::from_str(DATASET_ENTRY).unwrap();
        let mut hero = original.clone();

        let patch: HeroPatch =
            serde_json::from_str(r#"{"name": "Dark Knight", "work": {"occupation": "Vigilante"}}"#).unwrap();
        hero.apply_patch(patch);

        assert_eq!(hero.id, original.id);
        assert_eq!(hero.name, "Dark Knight");
        // The whole section is replaced, so base goes back to empty
        assert_eq!(hero.work.occupation, "Vigilante");
        assert_eq!(hero.work.base, "");
        assert_eq!(hero.biography, original.biography);
        assert_eq!(hero.images, original.images);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(HeroPatch::default().is_empty());
        assert!(!HeroPatch::name("x").is_empty());
    }

    #[test]
    fn test_powerstats_average() {
        assert_eq!(Powerstats::uniform(DEFAULT_POWERSTAT).average(), 50.0);
        assert_eq!(Powerstats::default().total(), 0);
    }
}
