// QS Compass — Ambient Display State
//
// Active: sensors subscribed, full compass layout.
// Ambient: sensors unsubscribed, dim tip layout, optional burn-in jitter.
//
// Every callback goes through `DisplayState::transition`, which returns the
// side effects the caller must apply (sensor subscription, layout, padding).

use rand::Rng;

use crate::config::BURN_IN_OFFSET_PX;
use crate::events::AmbientEvent;

/// Root padding applied to the whole screen, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ORIGIN: Offset = Offset { x: 0, y: 0 };

    /// Uniform jitter in `[-BURN_IN_OFFSET_PX, BURN_IN_OFFSET_PX]` on each axis.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(-BURN_IN_OFFSET_PX..=BURN_IN_OFFSET_PX),
            y: rng.gen_range(-BURN_IN_OFFSET_PX..=BURN_IN_OFFSET_PX),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SubscribeSensors,
    UnsubscribeSensors,
    /// Full compass layout, normal background.
    ShowCompass,
    /// Ambient tip layout, dark background.
    ShowAmbient,
    SetPadding(Offset),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Active,
    Ambient {
        burn_in_protection: bool,
        offset: Offset,
    },
}

impl DisplayState {
    pub fn is_ambient(&self) -> bool {
        matches!(self, Self::Ambient { .. })
    }

    /// Current padding; always the origin while Active.
    pub fn offset(&self) -> Offset {
        match self {
            Self::Active => Offset::ORIGIN,
            Self::Ambient { offset, .. } => *offset,
        }
    }

    /// Apply one ambient callback and return the effects to carry out, in
    /// order. Callbacks that make no sense in the current state are ignored.
    pub fn transition<R: Rng + ?Sized>(&mut self, event: AmbientEvent, rng: &mut R) -> Vec<Effect> {
        match (*self, event) {
            (Self::Active, AmbientEvent::Enter { burn_in_protection }) => {
                log::info!("Entering ambient mode (burn-in protection: {})", burn_in_protection);
                *self = Self::Ambient { burn_in_protection, offset: Offset::ORIGIN };
                vec![
                    Effect::UnsubscribeSensors,
                    Effect::ShowAmbient,
                    Effect::SetPadding(Offset::ORIGIN),
                ]
            }

            (Self::Ambient { offset, .. }, AmbientEvent::Enter { burn_in_protection }) => {
                *self = Self::Ambient { burn_in_protection, offset };
                Vec::new()
            }

            (Self::Ambient { burn_in_protection: true, .. }, AmbientEvent::Update) => {
                let offset = Offset::random(rng);
                *self = Self::Ambient { burn_in_protection: true, offset };
                vec![Effect::SetPadding(offset)]
            }

            (Self::Ambient { burn_in_protection: false, .. }, AmbientEvent::Update) => Vec::new(),

            (Self::Ambient { .. }, AmbientEvent::Exit) => {
                log::info!("Leaving ambient mode");
                *self = Self::Active;
                vec![
                    Effect::SubscribeSensors,
                    Effect::SetPadding(Offset::ORIGIN),
                    Effect::ShowCompass,
                ]
            }

            (Self::Active, AmbientEvent::Update | AmbientEvent::Exit) => {
                log::debug!("Ignoring {:?} while active", event);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_enter_unsubscribes_and_dims() {
        let mut rng = rng();
        let mut state = DisplayState::default();
        let effects = state.transition(AmbientEvent::Enter { burn_in_protection: true }, &mut rng);

        assert_eq!(
            effects,
            vec![
                Effect::UnsubscribeSensors,
                Effect::ShowAmbient,
                Effect::SetPadding(Offset::ORIGIN)
            ]
        );
        assert!(state.is_ambient());
        assert_eq!(state.offset(), Offset::ORIGIN);
    }

    #[test]
    fn test_burn_in_offset_stays_in_range() {
        let mut rng = rng();
        let mut state = DisplayState::default();
        state.transition(AmbientEvent::Enter { burn_in_protection: true }, &mut rng);

        let mut moved = false;
        for _ in 0..1000 {
            let effects = state.transition(AmbientEvent::Update, &mut rng);
            let Some(Effect::SetPadding(offset)) = effects.first().copied() else {
                panic!("tick without padding: {:?}", effects);
            };
            assert!((-10..=10).contains(&offset.x), "x = {}", offset.x);
            assert!((-10..=10).contains(&offset.y), "y = {}", offset.y);
            assert_eq!(state.offset(), offset);
            moved |= offset != Offset::ORIGIN;
        }
        assert!(moved);
    }

    #[test]
    fn test_update_without_protection_is_noop() {
        let mut rng = rng();
        let mut state = DisplayState::default();
        state.transition(AmbientEvent::Enter { burn_in_protection: false }, &mut rng);

        for _ in 0..10 {
            assert!(state.transition(AmbientEvent::Update, &mut rng).is_empty());
        }
        assert_eq!(state.offset(), Offset::ORIGIN);
    }

    #[test]
    fn test_exit_resets_offset() {
        let mut rng = rng();
        let mut state = DisplayState::default();
        state.transition(AmbientEvent::Enter { burn_in_protection: true }, &mut rng);
        while state.offset() == Offset::ORIGIN {
            state.transition(AmbientEvent::Update, &mut rng);
        }

        let effects = state.transition(AmbientEvent::Exit, &mut rng);
        assert_eq!(
            effects,
            vec![
                Effect::SubscribeSensors,
                Effect::SetPadding(Offset::ORIGIN),
                Effect::ShowCompass
            ]
        );
        assert_eq!(state, DisplayState::Active);
        assert_eq!(state.offset(), Offset::ORIGIN);
    }

    #[test]
    fn test_callbacks_ignored_while_active() {
        let mut rng = rng();
        let mut state = DisplayState::Active;
        assert!(state.transition(AmbientEvent::Update, &mut rng).is_empty());
        assert!(state.transition(AmbientEvent::Exit, &mut rng).is_empty());
        assert_eq!(state, DisplayState::Active);
    }

    #[test]
    fn test_reenter_only_refreshes_flag() {
        let mut rng = rng();
        let mut state = DisplayState::default();
        state.transition(AmbientEvent::Enter { burn_in_protection: false }, &mut rng);
        let effects = state.transition(AmbientEvent::Enter { burn_in_protection: true }, &mut rng);
        assert!(effects.is_empty());
        assert_eq!(
            state,
            DisplayState::Ambient { burn_in_protection: true, offset: Offset::ORIGIN }
        );
    }
}
