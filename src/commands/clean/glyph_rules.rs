use super::remap::{Confidence, GlyphContext, GlyphPass, GlyphRule};

const fn rule(name: &'static str, glyph: char, replacement: &'static str) -> GlyphRule {
    GlyphRule {
        name,
        glyph,
        replacement,
        context: GlyphContext::Anywhere,
        confidence: Confidence::Certain,
        alternatives: &[],
    }
}

const fn majority(
    name: &'static str,
    glyph: char,
    replacement: &'static str,
    alternatives: &'static [&'static str],
) -> GlyphRule {
    GlyphRule {
        name,
        glyph,
        replacement,
        context: GlyphContext::Anywhere,
        confidence: Confidence::Majority,
        alternatives,
    }
}

const fn within(rule: GlyphRule, context: GlyphContext) -> GlyphRule {
    GlyphRule { context, ..rule }
}

// Glyphs the legacy decoder left behind in place of Tamil letters or vowel signs.
const FONT_GLYPHS: &[GlyphRule] = &[
    rule("brace_open_u_sign", '{', "ு"),
    rule("brace_close_uu_sign", '}', "ூ"),
    rule("inverted_exclamation_nnii", '\u{00A1}', "ணீ"),
    majority("guillemet_shi", '\u{00BB}', "ஷி", &["ழி"]),
    majority("ordinal_sii", '\u{00AA}', "சீ", &["ஸீ"]),
    rule("a_ring_yuu", '\u{00E5}', "யூ"),
];

const CONTROL_CODES: &[GlyphRule] = &[
    rule("cancel_character", '\u{0094}', ""),
    rule("private_use_two", '\u{0092}', "'"),
    rule("private_use_one", '\u{0091}', "'"),
    rule("index_control", '\u{0084}', ""),
];

const QUOTES: &[GlyphRule] = &[
    rule("left_single_quote", '\u{2018}', "'"),
    rule("right_single_quote", '\u{2019}', "'"),
    rule("left_double_quote", '\u{201C}', "\""),
    rule("right_double_quote", '\u{201D}', "\""),
    rule("low_double_quote", '\u{201E}', ""),
    rule("dagger", '\u{2020}', ""),
];

// First match wins, so narrower contexts come before the fallback.
const YEN_CONTEXTUAL: &[GlyphRule] = &[
    within(rule("yen_between_tamil", '\u{00A5}', "ஊ"), GlyphContext::BetweenTamil),
    within(
        majority("yen_word_final", '\u{00A5}', "ூ", &["ஊ"]),
        GlyphContext::TamilBeforeBoundary,
    ),
    rule("yen_standalone", '\u{00A5}', "ஊ"),
];

// Every `¥` is resolved by now, so a `+` beside one sees its final letter.
const PLUS_CONTEXTUAL: &[GlyphRule] = &[
    within(rule("plus_between_tamil", '+', "ூ"), GlyphContext::BetweenTamil),
    within(rule("plus_word_final", '+', "ூ"), GlyphContext::TamilBeforeBoundary),
];
// Contextual rules run last so the neighbours they inspect are already final.
pub const GLYPH_PASSES: &[GlyphPass] = &[
    GlyphPass {
        name: "font_glyphs",
        rules: FONT_GLYPHS,
    },
    GlyphPass {
        name: "control_codes",
        rules: CONTROL_CODES,
    },
    GlyphPass {
        name: "quotes",
        rules: QUOTES,
    },
    GlyphPass {
        name: "yen_contextual",
        rules: YEN_CONTEXTUAL,
    },
    GlyphPass {
        name: "plus_contextual",
        rules: PLUS_CONTEXTUAL,
    },
];
