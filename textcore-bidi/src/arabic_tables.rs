// THIS FILE IS AUTOGENERATED from the <isolated>, <final>, <initial> and
// <medial> decompositions of the Arabic Presentation Forms blocks.

/// The first character with presentation forms.
pub(crate) const FIRST_ARABIC_SHAPE: u32 = 0x0621;

/// The last character with presentation forms.
pub(crate) const LAST_ARABIC_SHAPE: u32 = 0x06D3;

/// Isolated, final, initial and medial forms, in the order of the two
/// joining bits. Characters without a form map to themselves.
#[rustfmt::skip]
pub(crate) static ARABIC_SHAPING: [[u16; 4]; (LAST_ARABIC_SHAPE - FIRST_ARABIC_SHAPE + 1) as usize] = [
    [0xFE80, 0x0621, 0x0621, 0x0621], // U+0621
    [0xFE81, 0xFE82, 0x0622, 0x0622], // U+0622
    [0xFE83, 0xFE84, 0x0623, 0x0623], // U+0623
    [0xFE85, 0xFE86, 0x0624, 0x0624], // U+0624
    [0xFE87, 0xFE88, 0x0625, 0x0625], // U+0625
    [0xFE89, 0xFE8A, 0xFE8B, 0xFE8C], // U+0626
    [0xFE8D, 0xFE8E, 0x0627, 0x0627], // U+0627
    [0xFE8F, 0xFE90, 0xFE91, 0xFE92], // U+0628
    [0xFE93, 0xFE94, 0x0629, 0x0629], // U+0629
    [0xFE95, 0xFE96, 0xFE97, 0xFE98], // U+062A
    [0xFE99, 0xFE9A, 0xFE9B, 0xFE9C], // U+062B
    [0xFE9D, 0xFE9E, 0xFE9F, 0xFEA0], // U+062C
    [0xFEA1, 0xFEA2, 0xFEA3, 0xFEA4], // U+062D
    [0xFEA5, 0xFEA6, 0xFEA7, 0xFEA8], // U+062E
    [0xFEA9, 0xFEAA, 0x062F, 0x062F], // U+062F
    [0xFEAB, 0xFEAC, 0x0630, 0x0630], // U+0630
    [0xFEAD, 0xFEAE, 0x0631, 0x0631], // U+0631
    [0xFEAF, 0xFEB0, 0x0632, 0x0632], // U+0632
    [0xFEB1, 0xFEB2, 0xFEB3, 0xFEB4], // U+0633
    [0xFEB5, 0xFEB6, 0xFEB7, 0xFEB8], // U+0634
    [0xFEB9, 0xFEBA, 0xFEBB, 0xFEBC], // U+0635
    [0xFEBD, 0xFEBE, 0xFEBF, 0xFEC0], // U+0636
    [0xFEC1, 0xFEC2, 0xFEC3, 0xFEC4], // U+0637
    [0xFEC5, 0xFEC6, 0xFEC7, 0xFEC8], // U+0638
    [0xFEC9, 0xFECA, 0xFECB, 0xFECC], // U+0639
    [0xFECD, 0xFECE, 0xFECF, 0xFED0], // U+063A
    [0x063B, 0x063B, 0x063B, 0x063B], // U+063B
    [0x063C, 0x063C, 0x063C, 0x063C], // U+063C
    [0x063D, 0x063D, 0x063D, 0x063D], // U+063D
    [0x063E, 0x063E, 0x063E, 0x063E], // U+063E
    [0x063F, 0x063F, 0x063F, 0x063F], // U+063F
    [0x0640, 0x0640, 0x0640, 0x0640], // U+0640
    [0xFED1, 0xFED2, 0xFED3, 0xFED4], // U+0641
    [0xFED5, 0xFED6, 0xFED7, 0xFED8], // U+0642
    [0xFED9, 0xFEDA, 0xFEDB, 0xFEDC], // U+0643
    [0xFEDD, 0xFEDE, 0xFEDF, 0xFEE0], // U+0644
    [0xFEE1, 0xFEE2, 0xFEE3, 0xFEE4], // U+0645
    [0xFEE5, 0xFEE6, 0xFEE7, 0xFEE8], // U+0646
    [0xFEE9, 0xFEEA, 0xFEEB, 0xFEEC], // U+0647
    [0xFEED, 0xFEEE, 0x0648, 0x0648], // U+0648
    [0xFEEF, 0xFEF0, 0xFBE8, 0xFBE9], // U+0649
    [0xFEF1, 0xFEF2, 0xFEF3, 0xFEF4], // U+064A
    [0x064B, 0x064B, 0x064B, 0x064B], // U+064B
    [0x064C, 0x064C, 0x064C, 0x064C], // U+064C
    [0x064D, 0x064D, 0x064D, 0x064D], // U+064D
    [0x064E, 0x064E, 0x064E, 0x064E], // U+064E
    [0x064F, 0x064F, 0x064F, 0x064F], // U+064F
    [0x0650, 0x0650, 0x0650, 0x0650], // U+0650
    [0x0651, 0x0651, 0x0651, 0x0651], // U+0651
    [0x0652, 0x0652, 0x0652, 0x0652], // U+0652
    [0x0653, 0x0653, 0x0653, 0x0653], // U+0653
    [0x0654, 0x0654, 0x0654, 0x0654], // U+0654
    [0x0655, 0x0655, 0x0655, 0x0655], // U+0655
    [0x0656, 0x0656, 0x0656, 0x0656], // U+0656
    [0x0657, 0x0657, 0x0657, 0x0657], // U+0657
    [0x0658, 0x0658, 0x0658, 0x0658], // U+0658
    [0x0659, 0x0659, 0x0659, 0x0659], // U+0659
    [0x065A, 0x065A, 0x065A, 0x065A], // U+065A
    [0x065B, 0x065B, 0x065B, 0x065B], // U+065B
    [0x065C, 0x065C, 0x065C, 0x065C], // U+065C
    [0x065D, 0x065D, 0x065D, 0x065D], // U+065D
    [0x065E, 0x065E, 0x065E, 0x065E], // U+065E
    [0x065F, 0x065F, 0x065F, 0x065F], // U+065F
    [0x0660, 0x0660, 0x0660, 0x0660], // U+0660
    [0x0661, 0x0661, 0x0661, 0x0661], // U+0661
    [0x0662, 0x0662, 0x0662, 0x0662], // U+0662
    [0x0663, 0x0663, 0x0663, 0x0663], // U+0663
    [0x0664, 0x0664, 0x0664, 0x0664], // U+0664
    [0x0665, 0x0665, 0x0665, 0x0665], // U+0665
    [0x0666, 0x0666, 0x0666, 0x0666], // U+0666
    [0x0667, 0x0667, 0x0667, 0x0667], // U+0667
    [0x0668, 0x0668, 0x0668, 0x0668], // U+0668
    [0x0669, 0x0669, 0x0669, 0x0669], // U+0669
    [0x066A, 0x066A, 0x066A, 0x066A], // U+066A
    [0x066B, 0x066B, 0x066B, 0x066B], // U+066B
    [0x066C, 0x066C, 0x066C, 0x066C], // U+066C
    [0x066D, 0x066D, 0x066D, 0x066D], // U+066D
    [0x066E, 0x066E, 0x066E, 0x066E], // U+066E
    [0x066F, 0x066F, 0x066F, 0x066F], // U+066F
    [0x0670, 0x0670, 0x0670, 0x0670], // U+0670
    [0xFB50, 0xFB51, 0x0671, 0x0671], // U+0671
    [0x0672, 0x0672, 0x0672, 0x0672], // U+0672
    [0x0673, 0x0673, 0x0673, 0x0673], // U+0673
    [0x0674, 0x0674, 0x0674, 0x0674], // U+0674
    [0x0675, 0x0675, 0x0675, 0x0675], // U+0675
    [0x0676, 0x0676, 0x0676, 0x0676], // U+0676
    [0xFBDD, 0x0677, 0x0677, 0x0677], // U+0677
    [0x0678, 0x0678, 0x0678, 0x0678], // U+0678
    [0xFB66, 0xFB67, 0xFB68, 0xFB69], // U+0679
    [0xFB5E, 0xFB5F, 0xFB60, 0xFB61], // U+067A
    [0xFB52, 0xFB53, 0xFB54, 0xFB55], // U+067B
    [0x067C, 0x067C, 0x067C, 0x067C], // U+067C
    [0x067D, 0x067D, 0x067D, 0x067D], // U+067D
    [0xFB56, 0xFB57, 0xFB58, 0xFB59], // U+067E
    [0xFB62, 0xFB63, 0xFB64, 0xFB65], // U+067F
    [0xFB5A, 0xFB5B, 0xFB5C, 0xFB5D], // U+0680
    [0x0681, 0x0681, 0x0681, 0x0681], // U+0681
    [0x0682, 0x0682, 0x0682, 0x0682], // U+0682
    [0xFB76, 0xFB77, 0xFB78, 0xFB79], // U+0683
    [0xFB72, 0xFB73, 0xFB74, 0xFB75], // U+0684
    [0x0685, 0x0685, 0x0685, 0x0685], // U+0685
    [0xFB7A, 0xFB7B, 0xFB7C, 0xFB7D], // U+0686
    [0xFB7E, 0xFB7F, 0xFB80, 0xFB81], // U+0687
    [0xFB88, 0xFB89, 0x0688, 0x0688], // U+0688
    [0x0689, 0x0689, 0x0689, 0x0689], // U+0689
    [0x068A, 0x068A, 0x068A, 0x068A], // U+068A
    [0x068B, 0x068B, 0x068B, 0x068B], // U+068B
    [0xFB84, 0xFB85, 0x068C, 0x068C], // U+068C
    [0xFB82, 0xFB83, 0x068D, 0x068D], // U+068D
    [0xFB86, 0xFB87, 0x068E, 0x068E], // U+068E
    [0x068F, 0x068F, 0x068F, 0x068F], // U+068F
    [0x0690, 0x0690, 0x0690, 0x0690], // U+0690
    [0xFB8C, 0xFB8D, 0x0691, 0x0691], // U+0691
    [0x0692, 0x0692, 0x0692, 0x0692], // U+0692
    [0x0693, 0x0693, 0x0693, 0x0693], // U+0693
    [0x0694, 0x0694, 0x0694, 0x0694], // U+0694
    [0x0695, 0x0695, 0x0695, 0x0695], // U+0695
    [0x0696, 0x0696, 0x0696, 0x0696], // U+0696
    [0x0697, 0x0697, 0x0697, 0x0697], // U+0697
    [0xFB8A, 0xFB8B, 0x0698, 0x0698], // U+0698
    [0x0699, 0x0699, 0x0699, 0x0699], // U+0699
    [0x069A, 0x069A, 0x069A, 0x069A], // U+069A
    [0x069B, 0x069B, 0x069B, 0x069B], // U+069B
    [0x069C, 0x069C, 0x069C, 0x069C], // U+069C
    [0x069D, 0x069D, 0x069D, 0x069D], // U+069D
    [0x069E, 0x069E, 0x069E, 0x069E], // U+069E
    [0x069F, 0x069F, 0x069F, 0x069F], // U+069F
    [0x06A0, 0x06A0, 0x06A0, 0x06A0], // U+06A0
    [0x06A1, 0x06A1, 0x06A1, 0x06A1], // U+06A1
    [0x06A2, 0x06A2, 0x06A2, 0x06A2], // U+06A2
    [0x06A3, 0x06A3, 0x06A3, 0x06A3], // U+06A3
    [0xFB6A, 0xFB6B, 0xFB6C, 0xFB6D], // U+06A4
    [0x06A5, 0x06A5, 0x06A5, 0x06A5], // U+06A5
    [0xFB6E, 0xFB6F, 0xFB70, 0xFB71], // U+06A6
    [0x06A7, 0x06A7, 0x06A7, 0x06A7], // U+06A7
    [0x06A8, 0x06A8, 0x06A8, 0x06A8], // U+06A8
    [0xFB8E, 0xFB8F, 0xFB90, 0xFB91], // U+06A9
    [0x06AA, 0x06AA, 0x06AA, 0x06AA], // U+06AA
    [0x06AB, 0x06AB, 0x06AB, 0x06AB], // U+06AB
    [0x06AC, 0x06AC, 0x06AC, 0x06AC], // U+06AC
    [0xFBD3, 0xFBD4, 0xFBD5, 0xFBD6], // U+06AD
    [0x06AE, 0x06AE, 0x06AE, 0x06AE], // U+06AE
    [0xFB92, 0xFB93, 0xFB94, 0xFB95], // U+06AF
    [0x06B0, 0x06B0, 0x06B0, 0x06B0], // U+06B0
    [0xFB9A, 0xFB9B, 0xFB9C, 0xFB9D], // U+06B1
    [0x06B2, 0x06B2, 0x06B2, 0x06B2], // U+06B2
    [0xFB96, 0xFB97, 0xFB98, 0xFB99], // U+06B3
    [0x06B4, 0x06B4, 0x06B4, 0x06B4], // U+06B4
    [0x06B5, 0x06B5, 0x06B5, 0x06B5], // U+06B5
    [0x06B6, 0x06B6, 0x06B6, 0x06B6], // U+06B6
    [0x06B7, 0x06B7, 0x06B7, 0x06B7], // U+06B7
    [0x06B8, 0x06B8, 0x06B8, 0x06B8], // U+06B8
    [0x06B9, 0x06B9, 0x06B9, 0x06B9], // U+06B9
    [0xFB9E, 0xFB9F, 0x06BA, 0x06BA], // U+06BA
    [0xFBA0, 0xFBA1, 0xFBA2, 0xFBA3], // U+06BB
    [0x06BC, 0x06BC, 0x06BC, 0x06BC], // U+06BC
    [0x06BD, 0x06BD, 0x06BD, 0x06BD], // U+06BD
    [0xFBAA, 0xFBAB, 0xFBAC, 0xFBAD], // U+06BE
    [0x06BF, 0x06BF, 0x06BF, 0x06BF], // U+06BF
    [0xFBA4, 0xFBA5, 0x06C0, 0x06C0], // U+06C0
    [0xFBA6, 0xFBA7, 0xFBA8, 0xFBA9], // U+06C1
    [0x06C2, 0x06C2, 0x06C2, 0x06C2], // U+06C2
    [0x06C3, 0x06C3, 0x06C3, 0x06C3], // U+06C3
    [0x06C4, 0x06C4, 0x06C4, 0x06C4], // U+06C4
    [0xFBE0, 0xFBE1, 0x06C5, 0x06C5], // U+06C5
    [0xFBD9, 0xFBDA, 0x06C6, 0x06C6], // U+06C6
    [0xFBD7, 0xFBD8, 0x06C7, 0x06C7], // U+06C7
    [0xFBDB, 0xFBDC, 0x06C8, 0x06C8], // U+06C8
    [0xFBE2, 0xFBE3, 0x06C9, 0x06C9], // U+06C9
    [0x06CA, 0x06CA, 0x06CA, 0x06CA], // U+06CA
    [0xFBDE, 0xFBDF, 0x06CB, 0x06CB], // U+06CB
    [0xFBFC, 0xFBFD, 0xFBFE, 0xFBFF], // U+06CC
    [0x06CD, 0x06CD, 0x06CD, 0x06CD], // U+06CD
    [0x06CE, 0x06CE, 0x06CE, 0x06CE], // U+06CE
    [0x06CF, 0x06CF, 0x06CF, 0x06CF], // U+06CF
    [0xFBE4, 0xFBE5, 0xFBE6, 0xFBE7], // U+06D0
    [0x06D1, 0x06D1, 0x06D1, 0x06D1], // U+06D1
    [0xFBAE, 0xFBAF, 0x06D2, 0x06D2], // U+06D2
    [0xFBB0, 0xFBB1, 0x06D3, 0x06D3], // U+06D3
];

/// Mandatory ligatures of presentation forms, sorted by pair.
#[rustfmt::skip]
pub(crate) static MANDATORY_LIGATURES: [([u16; 2], u16); 8] = [
    ([0xFEDF, 0xFE82], 0xFEF5),
    ([0xFEDF, 0xFE84], 0xFEF7),
    ([0xFEDF, 0xFE88], 0xFEF9),
    ([0xFEDF, 0xFE8E], 0xFEFB),
    ([0xFEE0, 0xFE82], 0xFEF6),
    ([0xFEE0, 0xFE84], 0xFEF8),
    ([0xFEE0, 0xFE88], 0xFEFA),
    ([0xFEE0, 0xFE8E], 0xFEFC),
];
