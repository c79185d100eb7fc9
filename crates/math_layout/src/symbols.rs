//! Symbol table
//!
//! Maps instruction names such as `alpha`, `sum` or `leq` to the glyphs that
//! draw them. A symbol may have a different representation per font
//! encoding; [`SymbolTable::resolve`] walks the encoding's fallback chain and
//! picks the first representation the active fonts can actually draw.

use std::collections::HashMap;
use text_metrics::FontEncoding;

// =============================================================================
// Symbol definitions
// =============================================================================

/// Extra geometry applied when drawing a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphTransform {
    #[default]
    None,
    /// Mirror around the vertical axis
    FlipHorizontal,
    /// Turn by 90 degrees
    QuarterTurn,
}

/// One concrete way of drawing a symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    /// Draw a short stroke through the ascender (as in h-bar)
    pub draw_bar: bool,
    pub transform: GlyphTransform,
}

impl Glyph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            draw_bar: false,
            transform: GlyphTransform::None,
        }
    }

    pub fn with_bar(mut self) -> Self {
        self.draw_bar = true;
        self
    }

    pub fn with_transform(mut self, transform: GlyphTransform) -> Self {
        self.transform = transform;
        self
    }
}

/// Style overrides and layout hints of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SymbolFlags {
    /// `Some(true)` forces italic, `Some(false)` forces upright
    pub italic: Option<bool>,
    /// `Some(true)` forces bold, `Some(false)` forces normal weight
    pub bold: Option<bool>,
    /// Overall height is derived from the ascent alone
    pub height_is_ascent: bool,
    /// Widened by the math operator factor inside math
    pub extend_width_in_math: bool,
}

/// Width of a glyph-less spacing symbol, relative to a reference glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub reference: char,
    pub factor: f64,
}

/// A named symbol
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolDef {
    pub unicode: Option<Glyph>,
    pub win_symbol: Option<Glyph>,
    pub standard: Option<Glyph>,
    pub flags: SymbolFlags,
    /// Font size multiplier
    pub font_factor: f64,
    /// Vertical offset of the glyph in multiples of its overall height
    pub y_factor: f64,
    /// Limits go above/below rather than beside
    pub stacked_operator: bool,
    /// Integral-like shape that needs x-corrections for its scripts
    pub integral: bool,
    /// Set for glyph-less spacing commands
    pub spacing: Option<Spacing>,
}

impl Default for SymbolDef {
    fn default() -> Self {
        Self {
            unicode: None,
            win_symbol: None,
            standard: None,
            flags: SymbolFlags::default(),
            font_factor: 1.0,
            y_factor: 0.0,
            stacked_operator: false,
            integral: false,
            spacing: None,
        }
    }
}

impl SymbolDef {
    /// Symbol with a Unicode glyph only
    pub fn unicode(text: impl Into<String>) -> Self {
        Self {
            unicode: Some(Glyph::new(text)),
            ..Self::default()
        }
    }

    /// Glyph-less horizontal space
    pub fn space(reference: char, factor: f64) -> Self {
        Self {
            spacing: Some(Spacing { reference, factor }),
            ..Self::default()
        }
    }

    pub fn with_win_symbol(mut self, text: impl Into<String>) -> Self {
        self.win_symbol = Some(Glyph::new(text));
        self
    }

    pub fn with_standard(mut self, glyph: Glyph) -> Self {
        self.standard = Some(glyph);
        self
    }

    pub fn upright(mut self) -> Self {
        self.flags.italic = Some(false);
        self
    }

    pub fn extended(mut self) -> Self {
        self.flags.extend_width_in_math = true;
        self
    }

    pub fn big_operator(mut self) -> Self {
        self.stacked_operator = true;
        self.flags.height_is_ascent = true;
        self.flags.italic = Some(false);
        self
    }

    pub fn integral(mut self) -> Self {
        self.integral = true;
        self.font_factor = 1.8;
        self.flags.height_is_ascent = true;
        self.flags.italic = Some(false);
        self
    }

    /// Representation for one encoding
    pub fn glyph(&self, encoding: FontEncoding) -> Option<&Glyph> {
        match encoding {
            FontEncoding::Unicode | FontEncoding::UnicodeLimited => self.unicode.as_ref(),
            FontEncoding::WinSymbol => self.win_symbol.as_ref(),
            FontEncoding::Standard => self.standard.as_ref(),
        }
    }
}

/// Result of resolving a symbol name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSymbol<'a> {
    pub def: &'a SymbolDef,
    /// Encoding whose representation was chosen
    pub encoding: FontEncoding,
    /// `None` for spacing symbols
    pub glyph: Option<&'a Glyph>,
}

// =============================================================================
// Symbol table
// =============================================================================

/// Name to symbol lookup
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolDef>,
}

impl SymbolTable {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the Greek alphabet, operators, relations, arrows and spacing
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.insert_greek();
        table.insert_operators();
        table.insert_relations();
        table.insert_arrows();
        table.insert_misc();
        table.insert_spacing();
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, def: SymbolDef) {
        self.symbols.insert(name.into(), def);
    }

    pub fn get(&self, name: &str) -> Option<&SymbolDef> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    /// Find the representation of `name` to draw with a face in `encoding`.
    ///
    /// `can_draw` reports whether the face used for a given encoding can draw a
    /// given string. Returns `None` for unknown names and for symbols none of
    /// whose representations can be drawn.
    pub fn resolve(
        &self,
        name: &str,
        encoding: FontEncoding,
        mut can_draw: impl FnMut(FontEncoding, &str) -> bool,
    ) -> Option<ResolvedSymbol<'_>> {
        let def = self.symbols.get(name)?;
        if def.spacing.is_some() {
            return Some(ResolvedSymbol {
                def,
                encoding,
                glyph: None,
            });
        }

        for &candidate in encoding.fallback_chain() {
            let Some(glyph) = def.glyph(candidate) else {
                continue;
            };
            if can_draw(candidate, &glyph.text) {
                if candidate != encoding {
                    tracing::debug!(
                        "Symbol '{}' drawn from {} fallback instead of {}",
                        name,
                        candidate,
                        encoding
                    );
                }
                return Some(ResolvedSymbol {
                    def,
                    encoding: candidate,
                    glyph: Some(glyph),
                });
            }
        }
        None
    }

    fn insert_greek(&mut self) {
        // (name, unicode, letter in the win-symbol face)
        const LOWER: &[(&str, &str, &str)] = &[
            ("alpha", "\u{3B1}", "a"),
            ("beta", "\u{3B2}", "b"),
            ("gamma", "\u{3B3}", "g"),
            ("delta", "\u{3B4}", "d"),
            ("epsilon", "\u{3F5}", "e"),
            ("varepsilon", "\u{3B5}", "e"),
            ("zeta", "\u{3B6}", "z"),
            ("eta", "\u{3B7}", "h"),
            ("theta", "\u{3B8}", "q"),
            ("vartheta", "\u{3D1}", "J"),
            ("iota", "\u{3B9}", "i"),
            ("kappa", "\u{3BA}", "k"),
            ("lambda", "\u{3BB}", "l"),
            ("mu", "\u{3BC}", "m"),
            ("nu", "\u{3BD}", "n"),
            ("xi", "\u{3BE}", "x"),
            ("pi", "\u{3C0}", "p"),
            ("varpi", "\u{3D6}", "v"),
            ("rho", "\u{3C1}", "r"),
            ("sigma", "\u{3C3}", "s"),
            ("varsigma", "\u{3C2}", "V"),
            ("tau", "\u{3C4}", "t"),
            ("upsilon", "\u{3C5}", "u"),
            ("phi", "\u{3D5}", "f"),
            ("varphi", "\u{3C6}", "j"),
            ("chi", "\u{3C7}", "c"),
            ("psi", "\u{3C8}", "y"),
            ("omega", "\u{3C9}", "w"),
        ];
        const UPPER: &[(&str, &str, &str)] = &[
            ("Gamma", "\u{393}", "G"),
            ("Delta", "\u{394}", "D"),
            ("Theta", "\u{398}", "Q"),
            ("Lambda", "\u{39B}", "L"),
            ("Xi", "\u{39E}", "X"),
            ("Pi", "\u{3A0}", "P"),
            ("Sigma", "\u{3A3}", "S"),
            ("Upsilon", "\u{3A5}", "U"),
            ("Phi", "\u{3A6}", "F"),
            ("Psi", "\u{3A8}", "Y"),
            ("Omega", "\u{3A9}", "W"),
        ];

        for &(name, unicode, win) in LOWER {
            self.insert(name, SymbolDef::unicode(unicode).with_win_symbol(win));
        }
        for &(name, unicode, win) in UPPER {
            self.insert(name, SymbolDef::unicode(unicode).with_win_symbol(win).upright());
        }
    }

    fn insert_operators(&mut self) {
        const BIG: &[(&str, &str, Option<&str>)] = &[
            ("sum", "\u{2211}", Some("S")),
            ("prod", "\u{220F}", Some("P")),
            ("coprod", "\u{2210}", None),
            ("bigcap", "\u{22C2}", Some("\u{C7}")),
            ("bigcup", "\u{22C3}", Some("\u{C8}")),
            ("bigvee", "\u{22C1}", Some("\u{DA}")),
            ("bigwedge", "\u{22C0}", Some("\u{D9}")),
            ("bigoplus", "\u{2A01}", Some("\u{C5}")),
            ("bigotimes", "\u{2A02}", Some("\u{C4}")),
        ];
        for &(name, unicode, win) in BIG {
            let mut def = SymbolDef::unicode(unicode).big_operator();
            if let Some(win) = win {
                def = def.with_win_symbol(win);
            }
            self.insert(name, def);
        }

        const INTEGRALS: &[(&str, &str)] = &[
            ("int", "\u{222B}"),
            ("iint", "\u{222C}"),
            ("iiint", "\u{222D}"),
            ("oint", "\u{222E}"),
            ("oiint", "\u{222F}"),
            ("oiiint", "\u{2230}"),
        ];
        for &(name, unicode) in INTEGRALS {
            let mut def = SymbolDef::unicode(unicode).integral();
            if name == "int" {
                def = def.with_win_symbol("\u{F2}");
            }
            self.insert(name, def);
        }

        // Named operators set in upright text; the limit-like ones stack
        for name in ["lim", "max", "min", "sup", "inf", "limsup", "liminf"] {
            let def = SymbolDef {
                standard: Some(Glyph::new(name)),
                stacked_operator: true,
                ..SymbolDef::default()
            };
            self.insert(name, def.upright());
        }
        for name in [
            "sin", "cos", "tan", "cot", "sinh", "cosh", "tanh", "arcsin", "arccos", "arctan",
            "log", "ln", "lg", "exp", "det", "dim", "ker", "arg", "deg", "gcd",
        ] {
            let def = SymbolDef {
                standard: Some(Glyph::new(name)),
                ..SymbolDef::default()
            };
            self.insert(name, def.upright());
        }
    }

    fn insert_relations(&mut self) {
        // (name, unicode, win-symbol, plain text)
        const RELATIONS: &[(&str, &str, Option<&str>, Option<&str>)] = &[
            ("leq", "\u{2264}", Some("\u{A3}"), Some("<=")),
            ("geq", "\u{2265}", Some("\u{B3}"), Some(">=")),
            ("neq", "\u{2260}", Some("\u{B9}"), Some("!=")),
            ("ne", "\u{2260}", Some("\u{B9}"), Some("!=")),
            ("ll", "\u{226A}", None, Some("<<")),
            ("gg", "\u{226B}", None, Some(">>")),
            ("approx", "\u{2248}", Some("\u{BB}"), Some("~")),
            ("equiv", "\u{2261}", Some("\u{BA}"), None),
            ("sim", "\u{223C}", Some("~"), Some("~")),
            ("cong", "\u{2245}", Some("@"), None),
            ("propto", "\u{221D}", Some("\u{B5}"), None),
            ("pm", "\u{B1}", Some("\u{B1}"), Some("+/-")),
            ("mp", "\u{2213}", None, Some("-/+")),
            ("times", "\u{D7}", Some("\u{B4}"), Some("x")),
            ("div", "\u{F7}", Some("\u{B8}"), Some(":")),
            ("cdot", "\u{22C5}", Some("\u{D7}"), Some(".")),
            ("circ", "\u{2218}", None, Some("o")),
            ("bullet", "\u{2219}", Some("\u{B7}"), None),
            ("in", "\u{2208}", Some("\u{CE}"), None),
            ("notin", "\u{2209}", Some("\u{CF}"), None),
            ("ni", "\u{220B}", Some("'"), None),
            ("subset", "\u{2282}", Some("\u{CC}"), None),
            ("supset", "\u{2283}", Some("\u{C9}"), None),
            ("subseteq", "\u{2286}", Some("\u{CD}"), None),
            ("supseteq", "\u{2287}", Some("\u{CA}"), None),
            ("cap", "\u{2229}", Some("\u{C7}"), None),
            ("cup", "\u{222A}", Some("\u{C8}"), None),
            ("wedge", "\u{2227}", Some("\u{D9}"), None),
            ("land", "\u{2227}", Some("\u{D9}"), None),
            ("vee", "\u{2228}", Some("\u{DA}"), None),
            ("lor", "\u{2228}", Some("\u{DA}"), None),
            ("oplus", "\u{2295}", Some("\u{C5}"), None),
            ("otimes", "\u{2297}", Some("\u{C4}"), None),
            ("odot", "\u{2299}", None, None),
            ("ominus", "\u{2296}", None, None),
            ("oslash", "\u{2298}", None, None),
            ("mid", "\u{2223}", Some("|"), Some("|")),
            ("bot", "\u{22A5}", Some("^"), None),
            ("+", "+", Some("+"), Some("+")),
            ("-", "\u{2212}", Some("-"), Some("-")),
            ("=", "=", Some("="), Some("=")),
            ("<", "<", Some("<"), Some("<")),
            (">", ">", Some(">"), Some(">")),
            ("*", "\u{2217}", Some("*"), Some("*")),
            ("/", "/", Some("/"), Some("/")),
        ];
        for &(name, unicode, win, standard) in RELATIONS {
            let mut def = SymbolDef::unicode(unicode).extended().upright();
            if let Some(win) = win {
                def = def.with_win_symbol(win);
            }
            if let Some(standard) = standard {
                def = def.with_standard(Glyph::new(standard));
            }
            self.insert(name, def);
        }
    }

    fn insert_arrows(&mut self) {
        const ARROWS: &[(&str, &str, Option<&str>, Option<&str>)] = &[
            ("to", "\u{2192}", Some("\u{AE}"), Some("->")),
            ("rightarrow", "\u{2192}", Some("\u{AE}"), Some("->")),
            ("leftarrow", "\u{2190}", Some("\u{AC}"), Some("<-")),
            ("leftrightarrow", "\u{2194}", Some("\u{AB}"), Some("<->")),
            ("uparrow", "\u{2191}", Some("\u{AD}"), None),
            ("downarrow", "\u{2193}", Some("\u{AF}"), None),
            ("updownarrow", "\u{2195}", None, None),
            ("Rightarrow", "\u{21D2}", Some("\u{DE}"), Some("=>")),
            ("Leftarrow", "\u{21D0}", Some("\u{DC}"), Some("<=")),
            ("Leftrightarrow", "\u{21D4}", Some("\u{DB}"), Some("<=>")),
            ("iff", "\u{21D4}", Some("\u{DB}"), Some("<=>")),
            ("Uparrow", "\u{21D1}", Some("\u{DD}"), None),
            ("Downarrow", "\u{21D3}", Some("\u{DF}"), None),
            ("mapsto", "\u{21A6}", None, Some("|->")),
            ("nearrow", "\u{2197}", None, None),
            ("searrow", "\u{2198}", None, None),
            ("nwarrow", "\u{2196}", None, None),
            ("swarrow", "\u{2199}", None, None),
        ];
        for &(name, unicode, win, standard) in ARROWS {
            let mut def = SymbolDef::unicode(unicode).extended().upright();
            if let Some(win) = win {
                def = def.with_win_symbol(win);
            }
            if let Some(standard) = standard {
                def = def.with_standard(Glyph::new(standard));
            }
            self.insert(name, def);
        }
    }

    fn insert_misc(&mut self) {
        self.insert(
            "infty",
            SymbolDef::unicode("\u{221E}")
                .with_win_symbol("\u{A5}")
                .with_standard(Glyph::new("8").with_transform(GlyphTransform::QuarterTurn))
                .upright(),
        );
        self.insert(
            "hbar",
            SymbolDef::unicode("\u{210F}").with_standard(Glyph::new("h").with_bar()),
        );
        self.insert(
            "backprime",
            SymbolDef::unicode("\u{2035}")
                .with_standard(Glyph::new("'").with_transform(GlyphTransform::FlipHorizontal))
                .upright(),
        );
        self.insert(
            "ell",
            SymbolDef::unicode("\u{2113}").with_standard(Glyph::new("l")),
        );
        self.insert(
            "partial",
            SymbolDef::unicode("\u{2202}").with_win_symbol("\u{B6}").with_standard(Glyph::new("d")),
        );
        self.insert(
            "ldots",
            SymbolDef::unicode("\u{2026}")
                .with_win_symbol("\u{BC}")
                .with_standard(Glyph::new("..."))
                .upright(),
        );
        self.insert(
            "dots",
            SymbolDef::unicode("\u{2026}")
                .with_win_symbol("\u{BC}")
                .with_standard(Glyph::new("..."))
                .upright(),
        );
        self.insert(
            "prime",
            SymbolDef::unicode("\u{2032}")
                .with_win_symbol("\u{A2}")
                .with_standard(Glyph::new("'"))
                .upright(),
        );

        const UPRIGHT: &[(&str, &str, Option<&str>)] = &[
            ("nabla", "\u{2207}", Some("\u{D1}")),
            ("forall", "\u{2200}", Some("\"")),
            ("exists", "\u{2203}", Some("$")),
            ("emptyset", "\u{2205}", Some("\u{C6}")),
            ("Re", "\u{211C}", Some("\u{C2}")),
            ("Im", "\u{2111}", Some("\u{C1}")),
            ("aleph", "\u{2135}", Some("\u{C0}")),
            ("neg", "\u{AC}", Some("\u{D8}")),
            ("degree", "\u{B0}", Some("\u{B0}")),
            ("cdots", "\u{22EF}", None),
            ("vdots", "\u{22EE}", None),
            ("ddots", "\u{22F1}", None),
            ("angle", "\u{2220}", Some("\u{D0}")),
            ("perp", "\u{27C2}", Some("^")),
            ("therefore", "\u{2234}", Some("\\")),
        ];
        for &(name, unicode, win) in UPRIGHT {
            let mut def = SymbolDef::unicode(unicode).upright();
            if let Some(win) = win {
                def = def.with_win_symbol(win);
            }
            self.insert(name, def);
        }
    }

    fn insert_spacing(&mut self) {
        self.insert("quad", SymbolDef::space('M', 1.0));
        self.insert("qquad", SymbolDef::space('M', 2.0));
        self.insert(" ", SymbolDef::space('x', 1.0));
        self.insert("space", SymbolDef::space('x', 1.0));
        self.insert(";", SymbolDef::space('x', 0.75));
        self.insert(":", SymbolDef::space('x', 0.5));
        self.insert(",", SymbolDef::space('x', 0.25));
        self.insert("!", SymbolDef::space('x', -0.25));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_contain_common_symbols() {
        let table = SymbolTable::with_defaults();
        for name in ["alpha", "Omega", "sum", "int", "leq", "to", "infty", "quad", "lim"] {
            assert!(table.contains(name), "missing {name}");
        }
        assert!(!table.contains("notasymbol"));
    }

    #[test]
    fn test_resolve_prefers_active_encoding() {
        let table = SymbolTable::with_defaults();
        let resolved = table.resolve("alpha", FontEncoding::Unicode, |_, _| true).unwrap();
        assert_eq!(resolved.encoding, FontEncoding::Unicode);
        assert_eq!(resolved.glyph.unwrap().text, "\u{3B1}");
    }

    #[test]
    fn test_resolve_walks_fallback_chain() {
        let table = SymbolTable::with_defaults();
        let resolved = table
            .resolve("alpha", FontEncoding::Unicode, |enc, _| enc == FontEncoding::WinSymbol)
            .unwrap();
        assert_eq!(resolved.encoding, FontEncoding::WinSymbol);
        assert_eq!(resolved.glyph.unwrap().text, "a");
    }

    #[test]
    fn test_resolve_skips_missing_representations() {
        let table = SymbolTable::with_defaults();
        // hbar has no win-symbol glyph; the plain fallback draws a barred h
        let resolved = table
            .resolve("hbar", FontEncoding::Unicode, |enc, _| enc == FontEncoding::Standard)
            .unwrap();
        let glyph = resolved.glyph.unwrap();
        assert_eq!(glyph.text, "h");
        assert!(glyph.draw_bar);
    }

    #[test]
    fn test_resolve_fails_when_nothing_drawable() {
        let table = SymbolTable::with_defaults();
        assert!(table.resolve("alpha", FontEncoding::Unicode, |_, _| false).is_none());
        assert!(table.resolve("nope", FontEncoding::Unicode, |_, _| true).is_none());
        // standard encoding has no fallbacks
        assert!(table.resolve("alpha", FontEncoding::Standard, |_, _| true).is_none());
    }

    #[test]
    fn test_spacing_resolves_without_glyph() {
        let table = SymbolTable::with_defaults();
        let resolved = table.resolve("quad", FontEncoding::Standard, |_, _| false).unwrap();
        assert!(resolved.glyph.is_none());
        assert_eq!(resolved.def.spacing, Some(Spacing { reference: 'M', factor: 1.0 }));
    }

    #[test]
    fn test_operator_kinds() {
        let table = SymbolTable::with_defaults();
        let sum = table.get("sum").unwrap();
        assert!(sum.stacked_operator);
        assert!(!sum.integral);

        let int = table.get("int").unwrap();
        assert!(int.integral);
        assert!(!int.stacked_operator);
        assert_eq!(int.font_factor, 1.8);

        assert!(table.get("leq").unwrap().flags.extend_width_in_math);
        assert_eq!(table.get("Gamma").unwrap().flags.italic, Some(false));
    }

    #[test]
    fn test_custom_symbol() {
        let mut table = SymbolTable::new();
        assert!(table.is_empty());
        table.insert("heart", SymbolDef::unicode("\u{2665}").with_standard(Glyph::new("<3")));
        assert_eq!(table.len(), 1);
        let resolved = table
            .resolve("heart", FontEncoding::UnicodeLimited, |enc, _| enc == FontEncoding::Standard)
            .unwrap();
        assert_eq!(resolved.glyph.unwrap().text, "<3");
    }
}
