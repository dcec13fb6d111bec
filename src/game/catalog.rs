//! The fixed set of items a session can show.

use rand::Rng;

use crate::error::{GameError, Result};

/// Straight-alpha RGBA color with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a packed `0xAARRGGBB` literal
    pub fn from_argb(argb: u32) -> Self {
        Self {
            a: ((argb >> 24) & 0xFF) as f32 / 255.0,
            r: ((argb >> 16) & 0xFF) as f32 / 255.0,
            g: ((argb >> 8) & 0xFF) as f32 / 255.0,
            b: (argb & 0xFF) as f32 / 255.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_vec4(self) -> glam::Vec4 {
        glam::Vec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn from_vec4(v: glam::Vec4) -> Self {
        let v = v.clamp(glam::Vec4::ZERO, glam::Vec4::ONE);
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Composite this color over an opaque backdrop
    pub fn over(self, backdrop: Color) -> Color {
        let a = self.a;
        Color::new(
            self.r * a + backdrop.r * (1.0 - a),
            self.g * a + backdrop.g * (1.0 - a),
            self.b * a + backdrop.b * (1.0 - a),
            1.0,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.r), c(self.g), c(self.b), c(self.a)]
    }
}

/// Sounds the engine can synthesize without any asset files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    Tambourine,
    GuitarScratch,
    Drum,
    Bell,
}

/// Where an item's sound comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundSource {
    /// WAV file on disk
    File(&'static str),
    /// Built-in synthesized instrument
    Synth(Instrument),
}

impl std::fmt::Display for SoundSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoundSource::File(path) => write!(f, "{}", path),
            SoundSource::Synth(instrument) => write!(f, "synth:{:?}", instrument),
        }
    }
}

/// One thing the game can display and play
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: &'static str,
    /// Icon image; a plain disc is drawn when absent or unreadable
    pub image: Option<&'static str>,
    pub color: Color,
    pub sound: SoundSource,
}

/// Position of an item in its catalog; only a `Catalog` hands these out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(usize);

impl ItemId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered, immutable, never empty
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(GameError::EmptyCatalog);
        }
        Ok(Self { items })
    }

    /// The instruments shipped with the game
    pub fn builtin() -> Result<Self> {
        Self::new(vec![
            Item {
                name: "tambourine",
                image: Some("assets/tambourine.png"),
                color: Color::from_argb(0xFF8BC34A),
                sound: SoundSource::Synth(Instrument::Tambourine),
            },
            Item {
                name: "guitar",
                image: Some("assets/guitar.png"),
                color: Color::from_argb(0xFFF44336),
                sound: SoundSource::Synth(Instrument::GuitarScratch),
            },
            Item {
                name: "drum",
                image: Some("assets/drum.png"),
                color: Color::from_argb(0xFF2196F3),
                sound: SoundSource::Synth(Instrument::Drum),
            },
            Item {
                name: "bell",
                image: Some("assets/bell.png"),
                color: Color::from_argb(0xFFFFC107),
                sound: SoundSource::Synth(Instrument::Bell),
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> &Item {
        &self.items[id.0]
    }

    /// The id at `index`, if the catalog has that many items
    pub fn id(&self, index: usize) -> Option<ItemId> {
        (index < self.items.len()).then_some(ItemId(index))
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> {
        (0..self.items.len()).map(ItemId)
    }

    pub fn pick_random(&self, rng: &mut impl Rng) -> ItemId {
        ItemId(rng.gen_range(0..self.items.len()))
    }

    /// Uniform pick among every item except `current`.
    ///
    /// A single-item catalog returns `current` unchanged.
    pub fn pick_random_excluding(&self, current: ItemId, rng: &mut impl Rng) -> ItemId {
        if self.items.len() < 2 {
            return current;
        }
        let index = rng.gen_range(0..self.items.len() - 1);
        if index >= current.0 {
            ItemId(index + 1)
        } else {
            ItemId(index)
        }
    }
}
