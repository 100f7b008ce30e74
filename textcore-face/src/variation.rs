//! Axes of variation, named instances and variation settings.

use textcore_read::{
    tables::{
        avar::Avar,
        fvar::{Fvar, InstanceCoords},
    },
    types::{F2Dot14, Fixed, NameId, Tag},
    TableProvider,
};

/// Axis of variation in a variable font.
///
/// In variable fonts, an axis usually refers to a single aspect of a
/// typeface's design that can be altered by the user.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    index: usize,
    tag: Tag,
    name_id: NameId,
    min: f32,
    default: f32,
    max: f32,
    is_hidden: bool,
}

impl Axis {
    /// Returns the tag that identifies the axis.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the index of the axis in its owning collection.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the localized string identifier for the name of the axis.
    pub fn name_id(&self) -> NameId {
        self.name_id
    }

    /// Returns true if the axis should be hidden in user interfaces.
    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    /// Returns the minimum value of the axis.
    pub fn min_value(&self) -> f32 {
        self.min
    }

    /// Returns the default value of the axis.
    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Returns the maximum value of the axis.
    pub fn max_value(&self) -> f32 {
        self.max
    }
}

/// Collection of axes in a variable font.
///
/// Converts user space coordinates to normalized coordinates through the
/// `fvar` ranges and the optional `avar` segment maps.
#[derive(Clone, Default)]
pub struct AxisCollection<'a> {
    fvar: Option<Fvar<'a>>,
    avar: Option<Avar<'a>>,
}

impl<'a> AxisCollection<'a> {
    /// Creates a new axis collection from the given font.
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let fvar = font.fvar().ok();
        let avar = fvar.and_then(|_| font.avar().ok());
        Self { fvar, avar }
    }

    /// Returns the number of variation axes in the font.
    pub fn len(&self) -> usize {
        self.fvar
            .as_ref()
            .map(|fvar| fvar.axis_count() as usize)
            .unwrap_or(0)
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the axis at the given index.
    pub fn get(&self, index: usize) -> Option<Axis> {
        let record = self.fvar.as_ref()?.axis(index.try_into().ok()?)?;
        Some(Axis {
            index,
            tag: record.axis_tag(),
            name_id: record.axis_name_id(),
            min: record.min_value().to_f32(),
            default: record.default_value().to_f32(),
            max: record.max_value().to_f32(),
            is_hidden: record.is_hidden(),
        })
    }

    /// Returns the axis with the given tag.
    pub fn get_by_tag(&self, tag: Tag) -> Option<Axis> {
        self.iter().find(|axis| axis.tag == tag)
    }

    /// Returns an iterator over the axes in the collection.
    pub fn iter(&self) -> impl Iterator<Item = Axis> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).filter_map(move |index| copy.get(index))
    }

    /// Returns the default user space coordinate of every axis.
    pub fn default_coords(&self) -> Vec<f32> {
        self.iter().map(|axis| axis.default).collect()
    }

    /// Overwrites the user space coordinates of the axes named by the
    /// settings. Settings for unknown axes are ignored; a later setting for
    /// the same axis wins.
    pub fn apply_settings<I>(&self, settings: I, user_coords: &mut [f32])
    where
        I: IntoIterator,
        I::Item: Into<VariationSetting>,
    {
        for setting in settings {
            let setting = setting.into();
            match self.get_by_tag(setting.tag) {
                Some(axis) => {
                    if let Some(coord) = user_coords.get_mut(axis.index) {
                        *coord = setting.value;
                    }
                }
                None => log::debug!("ignoring setting for unknown axis {}", setting.tag),
            }
        }
    }

    /// Converts user space coordinates, one per axis in axis order, to
    /// normalized coordinates. Missing values use the axis default.
    pub fn normalize(&self, user_coords: &[f32]) -> Vec<F2Dot14> {
        let Some(fvar) = self.fvar.as_ref() else {
            return Vec::new();
        };
        let user = user_coords
            .iter()
            .map(|coord| Fixed::from_f64(*coord as f64))
            .collect::<Vec<_>>();
        let mut normalized = vec![F2Dot14::ZERO; self.len()];
        fvar.normalize_coords(self.avar.as_ref(), &user, &mut normalized);
        normalized
    }

    /// Returns the normalized location for the given settings applied on
    /// top of the default coordinates.
    pub fn location<I>(&self, settings: I) -> Vec<F2Dot14>
    where
        I: IntoIterator,
        I::Item: Into<VariationSetting>,
    {
        let mut coords = self.default_coords();
        self.apply_settings(settings, &mut coords);
        self.normalize(&coords)
    }
}

/// Named instance of a variation.
///
/// A set of fixed axis positions selected by the type designer and
/// assigned a name.
#[derive(Clone)]
pub struct NamedInstance<'a> {
    subfamily_name_id: NameId,
    post_script_name_id: Option<NameId>,
    coords: InstanceCoords<'a>,
}

impl<'a> NamedInstance<'a> {
    /// Returns the string identifier for the subfamily name of the instance.
    pub fn subfamily_name_id(&self) -> NameId {
        self.subfamily_name_id
    }

    /// Returns the string identifier for the PostScript name of the
    /// instance.
    pub fn post_script_name_id(&self) -> Option<NameId> {
        self.post_script_name_id
    }

    /// Returns an iterator over the user space coordinates of the instance.
    pub fn user_coords(&self) -> impl Iterator<Item = f32> + 'a + Clone {
        self.coords.iter().map(|coord| coord.to_f32())
    }
}

/// Collection of named instances in a variable font.
///
/// Contains the instances declared in `fvar`, followed by the default
/// instance when none of the declared ones describes it.
#[derive(Clone, Default)]
pub struct NamedInstanceCollection<'a> {
    instances: Vec<NamedInstance<'a>>,
}

impl<'a> NamedInstanceCollection<'a> {
    /// Creates a new instance collection from the given font.
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let Ok(fvar) = font.fvar() else {
            return Self::default();
        };
        let name = font.name().ok();
        let instances = fvar
            .instances_with_default(name.as_ref())
            .filter_map(|instance| match instance {
                Ok(instance) => Some(NamedInstance {
                    subfamily_name_id: instance.subfamily_name_id,
                    post_script_name_id: instance.post_script_name_id,
                    coords: instance.coordinates,
                }),
                Err(e) => {
                    log::debug!("skipping named instance: {e}");
                    None
                }
            })
            .collect();
        Self { instances }
    }

    /// Returns the number of instances in the collection.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Returns the instance at the given index.
    pub fn get(&self, index: usize) -> Option<NamedInstance<'a>> {
        self.instances.get(index).cloned()
    }

    /// Returns an iterator over the instances in the collection.
    pub fn iter(&self) -> impl Iterator<Item = NamedInstance<'a>> + '_ {
        self.instances.iter().cloned()
    }
}

/// Position on a variation axis in user coordinates.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct VariationSetting {
    pub tag: Tag,
    pub value: f32,
}

impl VariationSetting {
    pub fn new(tag: Tag, value: f32) -> Self {
        Self { tag, value }
    }
}

impl From<(Tag, f32)> for VariationSetting {
    fn from((tag, value): (Tag, f32)) -> Self {
        Self { tag, value }
    }
}

impl From<&VariationSetting> for VariationSetting {
    fn from(setting: &VariationSetting) -> Self {
        *setting
    }
}

/// Parses a comma separated list of variation settings such as
/// `"wght=700,wdth=75"`.
///
/// Each entry is a tag of one to four letters, digits or underscores
/// (padded with spaces), an optional `=` and a number. A quoted tag must be
/// exactly four characters long. Malformed entries are skipped.
pub fn parse_variations(variations: &str) -> Vec<VariationSetting> {
    variations
        .split(',')
        .filter_map(|entry| {
            let setting = parse_setting(entry);
            if setting.is_none() && !entry.trim().is_empty() {
                log::debug!("skipping malformed variation {entry:?}");
            }
            setting
        })
        .collect()
}

fn parse_setting(entry: &str) -> Option<VariationSetting> {
    let rest = entry.trim_start_matches(' ');
    let (tag, rest) = parse_tag(rest)?;
    let rest = rest.trim_start_matches(' ');
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    let rest = rest.trim_start_matches(' ');
    let number_len = rest
        .find(|ch: char| !matches!(ch, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .unwrap_or(rest.len());
    let value = rest[..number_len].parse::<f32>().ok()?;
    if !rest[number_len..].trim_matches(' ').is_empty() {
        return None;
    }
    Some(VariationSetting::new(tag, value))
}

fn parse_tag(s: &str) -> Option<(Tag, &str)> {
    let quote = s.chars().next().filter(|ch| matches!(ch, '\'' | '"'));
    let s = match quote {
        Some(quote) => &s[quote.len_utf8()..],
        None => s,
    };
    let len = s
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .unwrap_or(s.len());
    if len == 0 || len > 4 {
        return None;
    }
    let mut bytes = [b' '; 4];
    bytes[..len].copy_from_slice(&s.as_bytes()[..len]);
    let mut rest = &s[len..];
    if let Some(quote) = quote {
        if len != 4 {
            return None;
        }
        rest = rest.strip_prefix(quote)?;
    }
    Some((Tag::new(&bytes), rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use textcore_read::FontRef;
    use textcore_test_data::{font_builder::FontBuilder, variations};

    fn variable_font(instances: &[variations::InstanceSpec]) -> Vec<u8> {
        let fvar = variations::fvar(
            &[
                (Tag::new(b"wght"), 100.0, 400.0, 900.0),
                (Tag::new(b"wdth"), 50.0, 100.0, 100.0),
            ],
            instances,
        );
        FontBuilder::default()
            .add_table(Tag::new(b"head"), textcore_test_data::head(1000, 0))
            .add_table(Tag::new(b"fvar"), fvar)
            .build()
    }

    fn setting(tag: &[u8; 4], value: f32) -> VariationSetting {
        VariationSetting::new(Tag::new(tag), value)
    }

    #[test]
    fn axes() {
        let data = variable_font(&[]);
        let font = FontRef::new(&data).unwrap();
        let axes = AxisCollection::new(&font);
        assert_eq!(axes.len(), 2);
        let wdth = axes.get_by_tag(Tag::new(b"wdth")).unwrap();
        assert_eq!(wdth.index(), 1);
        assert_eq!(
            (wdth.min_value(), wdth.default_value(), wdth.max_value()),
            (50.0, 100.0, 100.0)
        );
        assert!(!wdth.is_hidden());
        assert_eq!(wdth.name_id(), NameId::new(256));
        assert!(axes.get(2).is_none());
        assert_eq!(axes.default_coords(), [400.0, 100.0]);
    }

    #[test]
    fn location() {
        let data = variable_font(&[]);
        let font = FontRef::new(&data).unwrap();
        let axes = AxisCollection::new(&font);
        assert_eq!(
            axes.location([setting(b"wght", 900.0), setting(b"wdth", 75.0)]),
            [F2Dot14::from_f32(1.0), F2Dot14::from_f32(-0.5)]
        );
        // clamped to the axis range, unknown axes ignored
        assert_eq!(
            axes.location([setting(b"wght", 1000.0), setting(b"slnt", -10.0)]),
            [F2Dot14::from_f32(1.0), F2Dot14::ZERO]
        );
        assert_eq!(axes.location([setting(b"wght", 100.0)])[0], F2Dot14::from_f32(-1.0));
    }

    #[test]
    fn static_font_has_no_axes() {
        let data = FontBuilder::default()
            .add_table(Tag::new(b"head"), textcore_test_data::head(1000, 0))
            .build();
        let font = FontRef::new(&data).unwrap();
        let axes = AxisCollection::new(&font);
        assert!(axes.is_empty());
        assert!(axes.location([setting(b"wght", 700.0)]).is_empty());
        assert!(NamedInstanceCollection::new(&font).is_empty());
    }

    #[test]
    fn named_instances() {
        let data = variable_font(&[(258, &[700.0, 100.0], 259), (260, &[400.0, 75.0], 261)]);
        let font = FontRef::new(&data).unwrap();
        let instances = NamedInstanceCollection::new(&font);
        // the default instance is synthesized
        assert_eq!(instances.len(), 3);
        let bold = instances.get(0).unwrap();
        assert_eq!(bold.subfamily_name_id(), NameId::new(258));
        assert_eq!(bold.post_script_name_id(), Some(NameId::new(259)));
        assert_eq!(bold.user_coords().collect::<Vec<_>>(), [700.0, 100.0]);
        let default = instances.get(2).unwrap();
        assert_eq!(default.subfamily_name_id(), NameId::SUBFAMILY_NAME);
        assert_eq!(default.user_coords().collect::<Vec<_>>(), [400.0, 100.0]);
    }

    #[test]
    fn parse_settings() {
        assert_eq!(
            parse_variations("wght=700,wdth=75.5"),
            [setting(b"wght", 700.0), setting(b"wdth", 75.5)]
        );
        assert_eq!(
            parse_variations(" 'wght' = 300 , \"opsz\"12"),
            [setting(b"wght", 300.0), setting(b"opsz", 12.0)]
        );
        // short tags are padded with spaces
        assert_eq!(parse_variations("ab=1"), [setting(b"ab  ", 1.0)]);
        assert_eq!(parse_variations("wght=-0.5e1"), [setting(b"wght", -5.0)]);
    }

    #[test]
    fn malformed_settings_are_skipped() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(
            parse_variations("'wg'=1,toolong=2,wght=,=3,wdth=x,wght=700,,slnt=1 2"),
            [setting(b"wght", 700.0)]
        );
        assert!(parse_variations("'wght\"=1").is_empty());
        assert!(parse_variations("").is_empty());
    }
}
