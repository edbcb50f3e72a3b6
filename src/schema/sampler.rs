use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::core::texture::{FilterMode, SourceTexture, TextureWrapMode};

/// Magnification filter. `None` means "not specified, use the project
/// default" and is never written out.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MagFilterMode {
    #[default]
    None = 0,
    Nearest = 9728,
    Linear = 9729,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MinFilterMode {
    #[default]
    None = 0,
    Nearest = 9728,
    Linear = 9729,
    NearestMipmapNearest = 9984,
    LinearMipmapNearest = 9985,
    NearestMipmapLinear = 9986,
    LinearMipmapLinear = 9987,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum WrapMode {
    None = 0,
    ClampToEdge = 33071,
    MirroredRepeat = 33648,
    #[default]
    Repeat = 10497,
}

impl MagFilterMode {
    pub fn from_gl(value: u32) -> Self {
        match value {
            9728 => Self::Nearest,
            9729 => Self::Linear,
            _ => Self::None,
        }
    }
}

impl MinFilterMode {
    pub fn from_gl(value: u32) -> Self {
        match value {
            9728 => Self::Nearest,
            9729 => Self::Linear,
            9984 => Self::NearestMipmapNearest,
            9985 => Self::LinearMipmapNearest,
            9986 => Self::NearestMipmapLinear,
            9987 => Self::LinearMipmapLinear,
            _ => Self::None,
        }
    }
}

impl WrapMode {
    pub fn from_gl(value: u32) -> Self {
        match value {
            33071 => Self::ClampToEdge,
            33648 => Self::MirroredRepeat,
            10497 => Self::Repeat,
            _ => Self::None,
        }
    }

    /// Engine wrap mode for this glTF wrap mode. Unspecified wrapping repeats.
    pub fn to_engine(self) -> TextureWrapMode {
        match self {
            WrapMode::ClampToEdge => TextureWrapMode::Clamp,
            WrapMode::MirroredRepeat => TextureWrapMode::Mirror,
            WrapMode::None | WrapMode::Repeat => TextureWrapMode::Repeat,
        }
    }

    pub fn from_engine(mode: TextureWrapMode) -> Self {
        match mode {
            TextureWrapMode::Clamp => WrapMode::ClampToEdge,
            TextureWrapMode::Mirror | TextureWrapMode::MirrorOnce => WrapMode::MirroredRepeat,
            TextureWrapMode::Repeat => WrapMode::Repeat,
        }
    }
}


/// glTF texture sampler.
///
/// Serialization assumes linear filtering and repeat wrapping are the
/// project's defaults and only writes valid, non-default values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Sampler {
    pub mag_filter: MagFilterMode,
    pub min_filter: MinFilterMode,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
}

impl Sampler {
    /// Sampler matching the engine's filter and wrap modes.
    pub fn from_engine(filter: FilterMode, wrap_u: TextureWrapMode, wrap_v: TextureWrapMode) -> Self {
        let (mag_filter, min_filter) = match filter {
            FilterMode::Point => (MagFilterMode::Nearest, MinFilterMode::Nearest),
            FilterMode::Bilinear => (MagFilterMode::Linear, MinFilterMode::Linear),
            FilterMode::Trilinear => (MagFilterMode::Linear, MinFilterMode::LinearMipmapLinear),
        };
        Self {
            mag_filter,
            min_filter,
            wrap_s: WrapMode::from_engine(wrap_u),
            wrap_t: WrapMode::from_engine(wrap_v),
        }
    }

    pub fn for_texture(texture: &SourceTexture) -> Self {
        Self::from_engine(texture.filter_mode(), texture.wrap_u(), texture.wrap_v())
    }

    /// Engine filter mode. The minification filter decides first; mipmapped
    /// nearest filters map to point filtering even when mip levels are
    /// blended linearly.
    pub fn filter_mode(&self) -> FilterMode {
        convert_filter_mode(self.min_filter, self.mag_filter)
    }

    pub fn wrap_u(&self) -> TextureWrapMode {
        self.wrap_s.to_engine()
    }

    pub fn wrap_v(&self) -> TextureWrapMode {
        self.wrap_t.to_engine()
    }

    /// Writes wrapping and filtering onto `texture`. Unspecified filters are
    /// replaced by the given defaults first.
    pub fn apply(&self, texture: &mut SourceTexture, default_min: MinFilterMode, default_mag: MagFilterMode) {
        texture.set_wrap_u(self.wrap_u());
        texture.set_wrap_v(self.wrap_v());
        let min = if self.min_filter == MinFilterMode::None { default_min } else { self.min_filter };
        let mag = if self.mag_filter == MagFilterMode::None { default_mag } else { self.mag_filter };
        texture.set_filter_mode(convert_filter_mode(min, mag));
    }

    /// Returns true if the sampler serializes to an empty object.
    pub fn is_default(&self) -> bool {
        !self.writes_mag_filter()
            && !self.writes_min_filter()
            && !writes_wrap(self.wrap_s)
            && !writes_wrap(self.wrap_t)
    }

    fn writes_mag_filter(&self) -> bool {
        self.mag_filter == MagFilterMode::Nearest
    }

    fn writes_min_filter(&self) -> bool {
        !matches!(self.min_filter, MinFilterMode::None | MinFilterMode::Linear)
    }
}

fn writes_wrap(mode: WrapMode) -> bool {
    !matches!(mode, WrapMode::None | WrapMode::Repeat)
}

fn convert_filter_mode(min: MinFilterMode, mag: MagFilterMode) -> FilterMode {
    match min {
        MinFilterMode::LinearMipmapLinear => return FilterMode::Trilinear,
        MinFilterMode::Nearest
        | MinFilterMode::NearestMipmapNearest
        | MinFilterMode::NearestMipmapLinear => return FilterMode::Point,
        _ => {}
    }
    match mag {
        MagFilterMode::Nearest => FilterMode::Point,
        _ => FilterMode::Bilinear,
    }
}

impl Serialize for Sampler {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if self.writes_mag_filter() {
            map.serialize_entry("magFilter", &(self.mag_filter as u32))?;
        }
        if self.writes_min_filter() {
            map.serialize_entry("minFilter", &(self.min_filter as u32))?;
        }
        if writes_wrap(self.wrap_s) {
            map.serialize_entry("wrapS", &(self.wrap_s as u32))?;
        }
        if writes_wrap(self.wrap_t) {
            map.serialize_entry("wrapT", &(self.wrap_t as u32))?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSampler {
    mag_filter: Option<u32>,
    min_filter: Option<u32>,
    wrap_s: Option<u32>,
    wrap_t: Option<u32>,
}

impl<'de> Deserialize<'de> for Sampler {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSampler::deserialize(deserializer)?;
        Ok(Self {
            mag_filter: raw.mag_filter.map(MagFilterMode::from_gl).unwrap_or_default(),
            min_filter: raw.min_filter.map(MinFilterMode::from_gl).unwrap_or_default(),
            wrap_s: raw.wrap_s.map(WrapMode::from_gl).unwrap_or(WrapMode::Repeat),
            wrap_t: raw.wrap_t.map(WrapMode::from_gl).unwrap_or(WrapMode::Repeat),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::texture::TextureId;
    use serde_json::json;

    const WRAPS: [TextureWrapMode; 3] = [
        TextureWrapMode::Repeat,
        TextureWrapMode::Clamp,
        TextureWrapMode::Mirror,
    ];

    #[test]
    fn test_engine_round_trip() {
        for filter in [FilterMode::Point, FilterMode::Bilinear, FilterMode::Trilinear] {
            for u in WRAPS {
                for v in WRAPS {
                    let s = Sampler::from_engine(filter, u, v);
                    assert_eq!(s.filter_mode(), filter);
                    assert_eq!(s.wrap_u(), u);
                    assert_eq!(s.wrap_v(), v);
                }
            }
        }
    }

    #[test]
    fn test_mirror_once_maps_to_mirror() {
        let s = Sampler::from_engine(FilterMode::Bilinear, TextureWrapMode::MirrorOnce, TextureWrapMode::Repeat);
        assert_eq!(s.wrap_s, WrapMode::MirroredRepeat);
        assert_eq!(s.wrap_u(), TextureWrapMode::Mirror);
    }

    #[test]
    fn test_min_filter_takes_priority() {
        let s = Sampler {
            mag_filter: MagFilterMode::Nearest,
            min_filter: MinFilterMode::LinearMipmapLinear,
            ..Default::default()
        };
        assert_eq!(s.filter_mode(), FilterMode::Trilinear);

        let s = Sampler {
            mag_filter: MagFilterMode::Linear,
            min_filter: MinFilterMode::NearestMipmapLinear,
            ..Default::default()
        };
        // approximation: linear mip blending is lost
        assert_eq!(s.filter_mode(), FilterMode::Point);

        let s = Sampler {
            mag_filter: MagFilterMode::Nearest,
            min_filter: MinFilterMode::LinearMipmapNearest,
            ..Default::default()
        };
        assert_eq!(s.filter_mode(), FilterMode::Point);

        assert_eq!(Sampler::default().filter_mode(), FilterMode::Bilinear);
    }

    #[test]
    fn test_gltf_round_trip() {
        let combos = [
            (MagFilterMode::Nearest, MinFilterMode::Nearest),
            (MagFilterMode::Linear, MinFilterMode::Linear),
            (MagFilterMode::Linear, MinFilterMode::LinearMipmapLinear),
            (MagFilterMode::Nearest, MinFilterMode::NearestMipmapNearest),
        ];
        for (mag, min) in combos {
            let s = Sampler { mag_filter: mag, min_filter: min, wrap_s: WrapMode::ClampToEdge, wrap_t: WrapMode::MirroredRepeat };
            let back = Sampler::from_engine(s.filter_mode(), s.wrap_u(), s.wrap_v());
            assert_eq!(back.filter_mode(), s.filter_mode());
            assert_eq!(back.wrap_s, s.wrap_s);
            assert_eq!(back.wrap_t, s.wrap_t);
        }
    }

    #[test]
    fn test_serialization_omits_defaults() {
        let bilinear = Sampler::from_engine(FilterMode::Bilinear, TextureWrapMode::Repeat, TextureWrapMode::Repeat);
        assert!(bilinear.is_default());
        assert_eq!(serde_json::to_value(bilinear).unwrap(), json!({}));

        let point = Sampler::from_engine(FilterMode::Point, TextureWrapMode::Clamp, TextureWrapMode::Repeat);
        assert!(!point.is_default());
        assert_eq!(
            serde_json::to_value(point).unwrap(),
            json!({ "magFilter": 9728, "minFilter": 9728, "wrapS": 33071 })
        );

        let trilinear = Sampler::from_engine(FilterMode::Trilinear, TextureWrapMode::Repeat, TextureWrapMode::Mirror);
        assert_eq!(
            serde_json::to_value(trilinear).unwrap(),
            json!({ "minFilter": 9987, "wrapT": 33648 })
        );
    }

    #[test]
    fn test_deserialize_keeps_none_distinct_from_linear() {
        let s: Sampler = serde_json::from_str("{}").unwrap();
        assert_eq!(s.mag_filter, MagFilterMode::None);
        assert_eq!(s.min_filter, MinFilterMode::None);
        assert_eq!(s.wrap_s, WrapMode::Repeat);

        let s: Sampler = serde_json::from_str(r#"{"magFilter":9729,"minFilter":9729}"#).unwrap();
        assert_eq!(s.mag_filter, MagFilterMode::Linear);
        assert_eq!(s.min_filter, MinFilterMode::Linear);
    }

    #[test]
    fn test_apply_uses_defaults_for_unspecified_filters() {
        let mut tex = SourceTexture::new(TextureId(1), "t");
        let s = Sampler { wrap_s: WrapMode::ClampToEdge, ..Default::default() };

        s.apply(&mut tex, MinFilterMode::LinearMipmapLinear, MagFilterMode::Linear);
        assert_eq!(tex.filter_mode(), FilterMode::Trilinear);
        assert_eq!(tex.wrap_u(), TextureWrapMode::Clamp);
        assert_eq!(tex.wrap_v(), TextureWrapMode::Repeat);

        s.apply(&mut tex, MinFilterMode::Linear, MagFilterMode::Nearest);
        assert_eq!(tex.filter_mode(), FilterMode::Point);
    }
}
