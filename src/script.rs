use std::time::Duration;

use anyhow::{Result, bail};
use tracing::info;

use stepdeck::Presentation;

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Next,
    Step,
    Prev,
    Reset,
    Idle,
}

pub fn parse_keys(script: &str) -> Result<Vec<Key>> {
    let mut keys = Vec::new();
    for c in script.chars() {
        let key = match c {
            'n' | ' ' => Key::Next,
            'c' => Key::Step,
            'p' => Key::Prev,
            'r' => Key::Reset,
            '.' => Key::Idle,
            ',' | '\t' | '\n' => continue,
            other => bail!("unknown key '{other}' in script (use n, c, p, r or .)"),
        };
        keys.push(key);
    }
    Ok(keys)
}

/// Feeds `keys` to the deck, letting `tick` of time pass after each one,
/// and logs what is on screen.
pub fn run(presentation: &mut Presentation, keys: &[Key], tick: Duration) {
    presentation.deck.start(&mut presentation.scene);

    for key in keys {
        let outcome = match key {
            Key::Next => Some(presentation.deck.next(&mut presentation.scene)),
            Key::Step => Some(presentation.deck.step(&mut presentation.scene)),
            Key::Prev => Some(presentation.deck.prev(&mut presentation.scene)),
            Key::Reset => {
                presentation.deck.reset_current(&mut presentation.scene);
                None
            }
            Key::Idle => None,
        };
        presentation.frame(tick);

        let slide = presentation.current();
        let visible: Vec<&str> = presentation
            .scene
            .visible_children(&slide.viewport)
            .into_iter()
            .map(|id| id.as_str())
            .collect();
        info!(
            ?key,
            ?outcome,
            slide = %slide.id,
            step = presentation.deck.current_step(),
            visible = ?visible,
            "input"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepdeck::DeckConfig;

    #[test]
    fn parses_scripts() {
        let keys = parse_keys("n c,p.r").unwrap();
        assert_eq!(
            keys,
            vec![Key::Next, Key::Next, Key::Step, Key::Prev, Key::Idle, Key::Reset]
        );
    }

    #[test]
    fn runs_a_script_against_the_demo_deck() {
        let mut presentation = DeckConfig::demo().unwrap().build().unwrap();
        let keys = parse_keys("nccn").unwrap();
        run(&mut presentation, &keys, Duration::from_millis(250));

        assert_eq!(presentation.current().id.as_str(), "retrieval");
        assert_eq!(presentation.deck.current_step(), 0);
        // Leaving the autoregression slide rewound it.
        assert!(!presentation.scene.is_visible(&"prediction1".into()));

        run(&mut presentation, &parse_keys("nnr.").unwrap(), Duration::from_millis(250));
        assert_eq!(presentation.current().id.as_str(), "retrieval");
        assert_eq!(presentation.deck.current_step(), 0);
        assert!(!presentation.scene.is_visible(&"demo-step-1".into()));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse_keys("nx").is_err());
    }
}
