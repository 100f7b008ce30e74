//! a trait for things that can serve font tables

use types::Tag;

use crate::{tables, FontData, FontRead, FontReadWithArgs, ReadError};

/// A table that has an associated tag.
///
/// This is true of top-level tables, but not their various subtables.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: Tag;
}

/// An interface for accessing tables from a font (or font-like object)
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag).ok_or(ReadError::TableIsMissing(tag))
    }

    /// Reads any table that is self-describing and has a known tag.
    fn expect_table<T: TopLevelTable + FontRead<'a>>(&self) -> Result<T, ReadError> {
        self.expect_data_for_tag(T::TAG).and_then(FontRead::read)
    }

    /// The `head` table, falling back to `bhed` for Apple bitmap-only fonts.
    fn head(&self) -> Result<tables::head::Head<'a>, ReadError> {
        self.data_for_tag(tables::head::TAG)
            .or_else(|| self.data_for_tag(tables::head::BHED_TAG))
            .ok_or(ReadError::TableIsMissing(tables::head::TAG))
            .and_then(FontRead::read)
    }

    fn name(&self) -> Result<tables::name::Name<'a>, ReadError> {
        self.expect_table()
    }

    fn hhea(&self) -> Result<tables::hvhea::HVhea<'a>, ReadError> {
        self.expect_data_for_tag(tables::hvhea::HHEA_TAG)
            .and_then(FontRead::read)
    }

    fn vhea(&self) -> Result<tables::hvhea::HVhea<'a>, ReadError> {
        self.expect_data_for_tag(tables::hvhea::VHEA_TAG)
            .and_then(FontRead::read)
    }

    fn hmtx(&self) -> Result<tables::hvmtx::HVmtx<'a>, ReadError> {
        let num_glyphs = self.maxp().map(|maxp| maxp.num_glyphs())?;
        let number_of_h_metrics = self.hhea().map(|hhea| hhea.number_of_long_metrics())?;
        self.expect_data_for_tag(tables::hvmtx::HMTX_TAG)
            .and_then(|data| {
                FontReadWithArgs::read_with_args(data, &(number_of_h_metrics, num_glyphs))
            })
    }

    fn vmtx(&self) -> Result<tables::hvmtx::HVmtx<'a>, ReadError> {
        let num_glyphs = self.maxp().map(|maxp| maxp.num_glyphs())?;
        let number_of_v_metrics = self.vhea().map(|vhea| vhea.number_of_long_metrics())?;
        self.expect_data_for_tag(tables::hvmtx::VMTX_TAG)
            .and_then(|data| {
                FontReadWithArgs::read_with_args(data, &(number_of_v_metrics, num_glyphs))
            })
    }

    fn fvar(&self) -> Result<tables::fvar::Fvar<'a>, ReadError> {
        self.expect_table()
    }

    fn avar(&self) -> Result<tables::avar::Avar<'a>, ReadError> {
        self.expect_table()
    }

    fn hvar(&self) -> Result<tables::hvar::Hvar<'a>, ReadError> {
        self.expect_data_for_tag(tables::hvar::HVAR_TAG)
            .and_then(FontRead::read)
    }

    fn vvar(&self) -> Result<tables::hvar::Hvar<'a>, ReadError> {
        self.expect_data_for_tag(tables::hvar::VVAR_TAG)
            .and_then(FontRead::read)
    }

    fn mvar(&self) -> Result<tables::mvar::Mvar<'a>, ReadError> {
        self.expect_table()
    }

    fn maxp(&self) -> Result<tables::maxp::Maxp<'a>, ReadError> {
        self.expect_table()
    }

    fn os2(&self) -> Result<tables::os2::Os2<'a>, ReadError> {
        self.expect_table()
    }

    fn post(&self) -> Result<tables::post::Post<'a>, ReadError> {
        self.expect_table()
    }

    /// is_long can be optionally provided, if known, otherwise we look it up in head.
    fn loca(&self, is_long: impl Into<Option<bool>>) -> Result<tables::loca::Loca<'a>, ReadError> {
        let is_long = match is_long.into() {
            Some(val) => val,
            None => self.head()?.index_to_loc_format() == 1,
        };
        self.expect_data_for_tag(tables::loca::TAG)
            .and_then(|data| FontReadWithArgs::read_with_args(data, &is_long))
    }

    fn glyf(&self) -> Result<tables::glyf::Glyf<'a>, ReadError> {
        self.expect_table()
    }

    fn cmap(&self) -> Result<tables::cmap::Cmap<'a>, ReadError> {
        self.expect_table()
    }

    fn gdef(&self) -> Result<tables::gdef::Gdef<'a>, ReadError> {
        self.expect_table()
    }

    fn gpos(&self) -> Result<tables::gpos::Gpos<'a>, ReadError> {
        self.expect_data_for_tag(tables::gpos::TAG)
            .and_then(FontRead::read)
    }

    fn gsub(&self) -> Result<tables::gsub::Gsub<'a>, ReadError> {
        self.expect_data_for_tag(tables::gsub::TAG)
            .and_then(FontRead::read)
    }

    fn kern(&self) -> Result<tables::kern::Kern<'a>, ReadError> {
        self.expect_table()
    }

    fn kerx(&self) -> Result<tables::kerx::Kerx<'a>, ReadError> {
        self.expect_table()
    }

    fn morx(&self) -> Result<tables::morx::Morx<'a>, ReadError> {
        self.expect_table()
    }

    fn ankr(&self) -> Result<tables::ankr::Ankr<'a>, ReadError> {
        self.expect_table()
    }

    fn feat(&self) -> Result<tables::feat::Feat<'a>, ReadError> {
        self.expect_table()
    }

    fn trak(&self) -> Result<tables::trak::Trak<'a>, ReadError> {
        self.expect_table()
    }

    fn cblc(&self) -> Result<tables::bitmap::BitmapLocationTable<'a>, ReadError> {
        self.expect_data_for_tag(tables::bitmap::CBLC_TAG)
            .and_then(FontRead::read)
    }

    fn cbdt(&self) -> Result<tables::bitmap::BitmapDataTable<'a>, ReadError> {
        self.expect_data_for_tag(tables::bitmap::CBDT_TAG)
            .and_then(FontRead::read)
    }

    fn eblc(&self) -> Result<tables::bitmap::BitmapLocationTable<'a>, ReadError> {
        self.expect_data_for_tag(tables::bitmap::EBLC_TAG)
            .and_then(FontRead::read)
    }

    fn ebdt(&self) -> Result<tables::bitmap::BitmapDataTable<'a>, ReadError> {
        self.expect_data_for_tag(tables::bitmap::EBDT_TAG)
            .and_then(FontRead::read)
    }

    fn bloc(&self) -> Result<tables::bitmap::BitmapLocationTable<'a>, ReadError> {
        self.expect_data_for_tag(tables::bitmap::BLOC_TAG)
            .and_then(FontRead::read)
    }

    fn bdat(&self) -> Result<tables::bitmap::BitmapDataTable<'a>, ReadError> {
        self.expect_data_for_tag(tables::bitmap::BDAT_TAG)
            .and_then(FontRead::read)
    }

    fn sbix(&self) -> Result<tables::sbix::Sbix<'a>, ReadError> {
        let num_glyphs = self.maxp().map(|maxp| maxp.num_glyphs())?;
        self.expect_data_for_tag(tables::sbix::TAG)
            .and_then(|data| FontReadWithArgs::read_with_args(data, &num_glyphs))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    // serve some dummy versions of the tables used to compute hmtx. The only
    // fields that matter are maxp::num_glyphs and hhea::number_of_h_metrics,
    // everything else is zero'd out
    struct DummyProvider;

    impl TableProvider<'static> for DummyProvider {
        fn data_for_tag(&self, tag: Tag) -> Option<FontData<'static>> {
            if tag == Tag::new(b"maxp") {
                Some(FontData::new(&[
                    0, 0, 0x50, 0, // version 0.5
                    0, 3, // num_glyphs = 3
                ]))
            } else if tag == Tag::new(b"hhea") {
                Some(FontData::new(&[
                    0, 1, 0, 0, // version 1.0
                    0, 0, 0, 0, // ascender/descender
                    0, 0, 0, 0, // line gap/advance width
                    0, 0, 0, 0, // min left/right side bearing
                    0, 0, 0, 0, // x_max, caret_slope_rise
                    0, 0, 0, 0, // caret_slope_run, caret_offset
                    0, 0, 0, 0, // reserved1/2
                    0, 0, 0, 0, // reserved 3/4
                    0, 0, 0, 1, // metric format, number_of_h_metrics
                ]))
            } else if tag == Tag::new(b"hmtx") {
                Some(FontData::new(&[
                    0, 4, 0, 6, // LongHorMetric: 4, 6
                    0, 30, 0, 111, // two lsb entries
                ]))
            } else {
                None
            }
        }
    }

    #[test]
    fn hmtx_args_from_maxp_and_hhea() {
        let hmtx = DummyProvider.hmtx().unwrap();
        assert_eq!(hmtx.long_metrics().len(), 1);
        assert_eq!(hmtx.bearings().len(), 2);
        assert_eq!(hmtx.advance(types::GlyphId::new(2)), Some(4));
    }

    #[test]
    fn missing_tables() {
        assert!(matches!(
            DummyProvider.head(),
            Err(ReadError::TableIsMissing(tag)) if tag == Tag::new(b"head")
        ));
        assert!(matches!(
            DummyProvider.vmtx(),
            Err(ReadError::TableIsMissing(_))
        ));
    }
}
