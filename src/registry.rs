use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::demos::PanelKind;
use crate::error::{DeckError, TokenError};
use crate::theme::{Family, Token};

/// Zero-based position of a step in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ordinal(pub usize);

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A horizontal length, relative to the viewport width or absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Percent(f32),
    Px(f32),
}

impl Length {
    pub fn resolve(&self, viewport_width: f32) -> f32 {
        match *self {
            Length::Percent(p) => viewport_width * p / 100.0,
            Length::Px(px) => px,
        }
    }
}

impl FromStr for Length {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || TokenError::MalformedLength(s.to_string());
        let (number, build): (&str, fn(f32) -> Length) = if let Some(n) = trimmed.strip_suffix('%') {
            (n, Length::Percent)
        } else if let Some(n) = trimmed.strip_suffix("px") {
            (n, Length::Px)
        } else {
            return Err(malformed());
        };
        let value: f32 = number.trim().parse().map_err(|_| malformed())?;
        if !value.is_finite() {
            return Err(malformed());
        }
        Ok(build(value))
    }
}

/// Which horizontal edge the content panel is pinned to. Exactly one edge per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Left(Length),
    Right(Length),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub ordinal: Ordinal,
    pub text: String,
    pub panel: PanelKind,
    pub background: Token,
    pub accent: Token,
    pub anchor: Anchor,
    pub text_side: Side,
    pub shadow: Token,
}

impl StepRecord {
    pub fn left(&self) -> Option<Length> {
        match self.anchor {
            Anchor::Left(length) => Some(length),
            Anchor::Right(_) => None,
        }
    }

    pub fn right(&self) -> Option<Length> {
        match self.anchor {
            Anchor::Right(length) => Some(length),
            Anchor::Left(_) => None,
        }
    }
}

/// A step as written in a deck file, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    pub text: String,
    pub panel: PanelKind,
    pub background: String,
    pub accent: String,
    /// Defaults to the background token.
    #[serde(default)]
    pub shadow: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    pub text_side: Side,
}

impl StepSpec {
    fn into_record(self, ordinal: usize) -> Result<StepRecord, DeckError> {
        let token = |source: TokenError| DeckError::Token { ordinal, source };

        let anchor = match (self.left, self.right) {
            (Some(_), Some(_)) => return Err(DeckError::BothAnchors { ordinal }),
            (None, None) => return Err(DeckError::NoAnchor { ordinal }),
            (Some(left), None) => Anchor::Left(left.parse().map_err(token)?),
            (None, Some(right)) => Anchor::Right(right.parse().map_err(token)?),
        };
        let background: Token = self.background.parse().map_err(token)?;
        let accent: Token = self.accent.parse().map_err(token)?;
        let shadow = match self.shadow {
            Some(shadow) => shadow.parse().map_err(token)?,
            None => background,
        };

        Ok(StepRecord {
            ordinal: Ordinal(ordinal),
            text: self.text,
            panel: self.panel,
            background,
            accent,
            anchor,
            text_side: self.text_side,
            shadow,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: BTreeMap<Ordinal, StepRecord>,
}

impl StepRegistry {
    pub fn from_specs(specs: Vec<StepSpec>) -> Result<StepRegistry, DeckError> {
        if specs.is_empty() {
            return Err(DeckError::Empty);
        }
        let steps = specs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| spec.into_record(i).map(|record| (record.ordinal, record)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(StepRegistry { steps })
    }

    /// The portfolio deck: one logging project, one dependency dashboard, one code sandbox.
    pub fn builtin() -> StepRegistry {
        let green = (Token::palette(Family::Green, 100), Token::palette(Family::Green, 300));
        let purple = (Token::palette(Family::Purple, 100), Token::palette(Family::Purple, 300));
        let teal = (Token::palette(Family::Teal, 100), Token::palette(Family::Teal, 300));
        let flush = Length::Percent(0.0);

        let entries = [
            (BUILTIN_TEXTS[0], PanelKind::LoggerFirst, green, Anchor::Left(flush), Side::Right),
            (BUILTIN_TEXTS[1], PanelKind::LoggerSecond, green, Anchor::Left(flush), Side::Right),
            (BUILTIN_TEXTS[2], PanelKind::DashboardFirst, purple, Anchor::Right(flush), Side::Left),
            (BUILTIN_TEXTS[3], PanelKind::DashboardSecond, purple, Anchor::Right(flush), Side::Left),
            (BUILTIN_TEXTS[4], PanelKind::DocsiteFirst, teal, Anchor::Left(flush), Side::Right),
            (BUILTIN_TEXTS[5], PanelKind::DocsiteSecond, teal, Anchor::Left(flush), Side::Right),
        ];

        let steps = entries
            .into_iter()
            .enumerate()
            .map(|(i, (text, panel, (background, accent), anchor, text_side))| {
                let record = StepRecord {
                    ordinal: Ordinal(i),
                    text: text.to_string(),
                    panel,
                    background,
                    accent,
                    anchor,
                    text_side,
                    shadow: background,
                };
                (record.ordinal, record)
            })
            .collect();

        StepRegistry { steps }
    }

    /// Out-of-range ordinals yield `None`; callers keep their previous state.
    pub fn get(&self, ordinal: Ordinal) -> Option<&StepRecord> {
        self.steps.get(&ordinal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.values()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

const BUILTIN_TEXTS: [&str; 6] = [
    "Hovedprosjektet jeg jobber med handler om innsamling av bruker data. Der jobber jeg med frontend biten av data innsamling, samt lager SQL spørringer og lager dashboards.",
    "Verktøyeme og språkene brukt i prosjektet er Typescript, Google Cloud (BigQuery), AirFlow for aggregering av data og Looker for data visualisering.",
    "Driver også med en del side prosjekter. En av dem er å lage en \"dependency dashboard\".",
    "Denne gjør at vi mapper pakke avhengigheter innad frontend sfæren. Verktøyene jeg brukte her var Svelte, Node og Google Cloud (Cloud Functions og Cloud Storage).\nNår en ny pakke publiseres, sendes det en slack melding til alle appene som avhenger av pakken.",
    "Et til prosjekt er en kode sandkasse. Denne kan brukes for å teste kode med interne pakker, og kan brukes som live kodings verktøy.",
    "Teknologier brukt i dette prosjektet var SvelteKit, Node, Google Cloud (Firestore) og WebRTC for sanntids koding.",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(left: Option<&str>, right: Option<&str>) -> StepSpec {
        StepSpec {
            text: "hello".to_string(),
            panel: PanelKind::LoggerFirst,
            background: "blue-100".to_string(),
            accent: "blue-300".to_string(),
            shadow: None,
            left: left.map(str::to_string),
            right: right.map(str::to_string),
            text_side: Side::Right,
        }
    }

    #[test]
    fn builtin_lookup_returns_matching_record() {
        let registry = StepRegistry::builtin();
        assert_eq!(registry.len(), 6);

        let expected = [
            (PanelKind::LoggerFirst, Family::Green, Side::Right, true),
            (PanelKind::LoggerSecond, Family::Green, Side::Right, true),
            (PanelKind::DashboardFirst, Family::Purple, Side::Left, false),
            (PanelKind::DashboardSecond, Family::Purple, Side::Left, false),
            (PanelKind::DocsiteFirst, Family::Teal, Side::Right, true),
            (PanelKind::DocsiteSecond, Family::Teal, Side::Right, true),
        ];

        for (i, (panel, family, text_side, anchored_left)) in expected.into_iter().enumerate() {
            let record = registry.get(Ordinal(i)).expect("step should exist");
            assert_eq!(record.ordinal, Ordinal(i));
            assert_eq!(record.text, BUILTIN_TEXTS[i]);
            assert_eq!(record.panel, panel);
            assert_eq!(record.background, Token::palette(family, 100));
            assert_eq!(record.accent, Token::palette(family, 300));
            assert_eq!(record.shadow, Token::palette(family, 100));
            assert_eq!(record.text_side, text_side);
            assert_eq!(record.left().is_some(), anchored_left);
        }
    }

    #[test]
    fn every_record_has_exactly_one_anchor() {
        let registry = StepRegistry::builtin();
        for record in registry.iter() {
            assert!(record.left().is_some() ^ record.right().is_some(), "step {}", record.ordinal);
        }
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let registry = StepRegistry::builtin();
        assert!(registry.get(Ordinal(6)).is_none());
        assert!(registry.get(Ordinal(usize::MAX)).is_none());
    }

    #[test]
    fn from_specs_assigns_ordinals_in_order() {
        let registry =
            StepRegistry::from_specs(vec![spec(Some("0%"), None), spec(None, Some("24px"))]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(Ordinal(0)).unwrap().left(), Some(Length::Percent(0.0)));
        let second = registry.get(Ordinal(1)).unwrap();
        assert_eq!(second.right(), Some(Length::Px(24.0)));
        assert_eq!(second.left(), None);
        assert_eq!(second.shadow, second.background);
    }

    #[test]
    fn from_specs_rejects_invalid_anchors() {
        assert!(matches!(
            StepRegistry::from_specs(vec![spec(Some("0%"), Some("0%"))]),
            Err(DeckError::BothAnchors { ordinal: 0 })
        ));
        assert!(matches!(
            StepRegistry::from_specs(vec![spec(Some("0%"), None), spec(None, None)]),
            Err(DeckError::NoAnchor { ordinal: 1 })
        ));
        assert!(matches!(StepRegistry::from_specs(Vec::new()), Err(DeckError::Empty)));
    }

    #[test]
    fn from_specs_reports_bad_tokens_with_ordinal() {
        let mut bad = spec(Some("0%"), None);
        bad.accent = "orange-300".to_string();
        let err = StepRegistry::from_specs(vec![spec(Some("0%"), None), bad]).unwrap_err();
        assert!(matches!(err, DeckError::Token { ordinal: 1, source: TokenError::UnknownFamily(_) }));

        let err = StepRegistry::from_specs(vec![spec(Some("zero"), None)]).unwrap_err();
        assert!(matches!(err, DeckError::Token { ordinal: 0, source: TokenError::MalformedLength(_) }));
    }

    #[test]
    fn lengths_parse_and_resolve() {
        assert_eq!("0%".parse::<Length>(), Ok(Length::Percent(0.0)));
        assert_eq!(" 12.5 % ".parse::<Length>(), Ok(Length::Percent(12.5)));
        assert_eq!("24px".parse::<Length>(), Ok(Length::Px(24.0)));
        assert!("24".parse::<Length>().is_err());
        assert!("NaN%".parse::<Length>().is_err());
        assert_eq!(Length::Percent(25.0).resolve(1920.0), 480.0);
        assert_eq!(Length::Px(24.0).resolve(1920.0), 24.0);
    }
}
