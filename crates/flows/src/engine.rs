//! The flow transition function
//!
//! [`step`] is a pure function of (session, profile, event): it performs no
//! I/O and returns the next session, the effects to render, and at most one
//! pending profile write. The dispatcher executes the write first and only
//! commits the session if it succeeds, so a failed write never advances the
//! conversation.
//!
//! An event the current state does not accept yields `None`; the caller
//! leaves everything untouched.

use fitbot_config::{Messages, Tariffs};
use fitbot_core::{
    Effect, FlowEvent, Keyboard, Profile, ProfileField, ProfilePatch, ProfileWrite,
};

use crate::render::{self, labels};
use crate::session::{FormData, Session};
use crate::state::FlowState;
use crate::validators::{validate, ValidationMode};

/// Read-only configuration the engine renders from
#[derive(Clone, Copy)]
pub struct FlowContext<'a> {
    pub messages: &'a Messages,
    pub tariffs: &'a Tariffs,
}

/// Result of one accepted event
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Session to commit after the write (if any) succeeds
    pub session: Session,
    /// Rendering requests, in delivery order
    pub effects: Vec<Effect>,
    /// Pending repository mutation, executed before the session commit
    pub write: Option<ProfileWrite>,
}

impl StepOutcome {
    fn new(session: Session, effects: Vec<Effect>) -> Self {
        Self {
            session,
            effects,
            write: None,
        }
    }

    fn with_write(session: Session, effects: Vec<Effect>, write: ProfileWrite) -> Self {
        Self {
            session,
            effects,
            write: Some(write),
        }
    }
}

/// Advance one conversation by one event
pub fn step(
    session: &Session,
    profile: Option<&Profile>,
    event: &FlowEvent,
    ctx: &FlowContext<'_>,
) -> Option<StepOutcome> {
    match &session.state {
        FlowState::Idle => idle_step(session, profile, event, ctx),
        FlowState::AwaitingTerms => terms_step(session, profile, event, ctx),
        FlowState::Register(field) => register_step(*field, session, profile, event, ctx),
        FlowState::EditMenu => edit_menu_step(session, profile, event, ctx),
        FlowState::EditField(field) => edit_field_step(*field, session, profile, event, ctx),
        FlowState::TariffSelected(tier) => tariff_step(tier, session, profile, event, ctx),
    }
}

/// Main-menu screen appropriate for the user's registration status
fn menu_screen(profile: Option<&Profile>, ctx: &FlowContext<'_>) -> Effect {
    match profile {
        Some(_) => Effect::keep(&ctx.messages.client_menu, render::client_menu()),
        None => Effect::keep(&ctx.messages.main_menu, render::main_menu()),
    }
}

/// Tariff entry screen: owned-tier card or the tier list
fn tariff_screen(profile: Option<&Profile>, ctx: &FlowContext<'_>) -> Effect {
    match profile.and_then(|p| p.tariff_name.as_deref()) {
        Some(tier) => Effect::keep(
            ctx.messages.tariff_owned(tier),
            render::tariff_owned_keyboard(),
        ),
        None => Effect::keep(&ctx.messages.tariff_choose, render::tariff_menu(ctx.tariffs)),
    }
}

fn profile_screen(profile: Option<&Profile>, ctx: &FlowContext<'_>) -> Effect {
    match profile {
        Some(p) => Effect::keep(
            render::profile_card(p, ctx.messages),
            render::profile_keyboard(),
        ),
        None => Effect::temp(&ctx.messages.profile_not_found, render::main_menu()),
    }
}

/// The Menu/Profile/Tariff buttons abandon whatever flow is in progress.
/// Session data is dropped; any in-progress registration is lost.
fn forced_exit(
    profile: Option<&Profile>,
    text: &str,
    ctx: &FlowContext<'_>,
) -> Option<StepOutcome> {
    let effect = match text {
        labels::MENU => menu_screen(profile, ctx),
        labels::PROFILE => profile_screen(profile, ctx),
        labels::TARIFF => tariff_screen(profile, ctx),
        _ => return None,
    };
    Some(StepOutcome::new(Session::idle(), vec![effect]))
}

/// Registration intent: the menu button label or any phrase mentioning it
fn is_registration_intent(text: &str) -> bool {
    text == labels::REGISTER || text.to_lowercase().contains("regist")
}

/// Fresh entry into the terms step. Registration always restarts here;
/// whatever the previous session held is dropped.
fn enter_terms(ctx: &FlowContext<'_>) -> StepOutcome {
    let mut next = Session::idle();
    next.state = FlowState::AwaitingTerms;
    StepOutcome::new(
        next,
        vec![Effect::keep(&ctx.messages.terms, render::terms_keyboard())],
    )
}

fn prompt_effect(field: ProfileField, ctx: &FlowContext<'_>) -> Effect {
    Effect::temp(ctx.messages.prompt(field), render::cancel_keyboard())
}

fn idle_step(
    session: &Session,
    profile: Option<&Profile>,
    event: &FlowEvent,
    ctx: &FlowContext<'_>,
) -> Option<StepOutcome> {
    if matches!(event, FlowEvent::Start) {
        let effect = match profile {
            Some(_) => Effect::keep(&ctx.messages.welcome_back, render::client_menu()),
            None => Effect::keep(&ctx.messages.welcome_new, render::main_menu()),
        };
        return Some(StepOutcome::new(Session::idle(), vec![effect]));
    }

    let text = event.as_text()?;

    if is_registration_intent(text) {
        return Some(enter_terms(ctx));
    }

    if let Some(outcome) = forced_exit(profile, text, ctx) {
        return Some(outcome);
    }

    match text {
        labels::BACK => Some(StepOutcome::new(
            Session::idle(),
            vec![menu_screen(profile, ctx)],
        )),
        labels::ABOUT => Some(StepOutcome::new(
            session.clone(),
            vec![Effect::temp(&ctx.messages.about, Keyboard::None)],
        )),
        labels::CONSULTATION => Some(StepOutcome::new(
            session.clone(),
            vec![Effect::temp(&ctx.messages.consultation, Keyboard::None)],
        )),
        labels::EDIT_PROFILE => match profile {
            Some(p) => {
                let mut next = Session::idle();
                next.state = FlowState::EditMenu;
                next.data = FormData::from_profile(p);
                let (text, keyboard) = render::edit_menu(&next.data, ctx.messages);
                Some(StepOutcome::new(next, vec![Effect::keep(text, keyboard)]))
            }
            None => Some(StepOutcome::new(
                Session::idle(),
                vec![Effect::temp(
                    &ctx.messages.profile_not_found,
                    render::main_menu(),
                )],
            )),
        },
        labels::CHANGE_TARIFF => Some(StepOutcome::new(
            Session::idle(),
            vec![Effect::keep(
                &ctx.messages.tariff_choose_new,
                render::tariff_menu(ctx.tariffs),
            )],
        )),
        _ => {
            // Tier names come from configuration, so they are matched
            // dynamically rather than declared as static triggers
            let tier = ctx.tariffs.find(text)?;
            let mut next = Session::idle();
            next.state = FlowState::TariffSelected(tier.name.clone());
            Some(StepOutcome::new(
                next,
                vec![Effect::keep(&tier.description, render::purchase_keyboard())],
            ))
        }
    }
}

fn terms_step(
    _session: &Session,
    profile: Option<&Profile>,
    event: &FlowEvent,
    ctx: &FlowContext<'_>,
) -> Option<StepOutcome> {
    let text = event.as_text()?;

    match text {
        labels::ACCEPT => {
            let mut next = Session::idle();
            next.state = FlowState::Register(ProfileField::FirstName);

            let (preview_text, preview_kb) = render::preview(&next.data, ctx.messages);
            let effects = vec![
                Effect::keep(&ctx.messages.registration_intro, render::cancel_keyboard()),
                Effect::keep(preview_text, preview_kb),
                prompt_effect(ProfileField::FirstName, ctx),
            ];

            let patch = ProfilePatch {
                agreed_terms: Some(true),
                ..Default::default()
            };
            // Upsert only here: the profile record is born on terms acceptance
            Some(StepOutcome::with_write(
                next,
                effects,
                ProfileWrite::Upsert { patch },
            ))
        }
        labels::DECLINE => Some(StepOutcome::new(
            Session::idle(),
            vec![
                Effect::temp(&ctx.messages.registration_declined, Keyboard::Empty),
                menu_screen(profile, ctx),
            ],
        )),
        _ => {
            if is_registration_intent(text) {
                return Some(enter_terms(ctx));
            }
            forced_exit(profile, text, ctx)
        }
    }
}

fn register_step(
    field: ProfileField,
    session: &Session,
    profile: Option<&Profile>,
    event: &FlowEvent,
    ctx: &FlowContext<'_>,
) -> Option<StepOutcome> {
    if let Some(token) = event.as_callback() {
        if token == labels::FINALIZE_TOKEN {
            return Some(finalize(session, ctx, CommitMode::Registration));
        }
        let target = render::field_from_token(token)?;
        return Some(jump_to_field(session, target, ctx, CommitMode::Registration));
    }

    let text = event.as_text()?;

    match text {
        labels::CANCEL => Some(StepOutcome::new(
            Session::idle(),
            vec![
                Effect::temp(&ctx.messages.registration_cancelled, Keyboard::Empty),
                menu_screen(profile, ctx),
            ],
        )),
        // Pressing the register button mid-flow never restarts the flow
        labels::REGISTER => Some(StepOutcome::new(
            session.clone(),
            vec![Effect::temp(&ctx.messages.continue_hint, Keyboard::None)],
        )),
        _ => {
            // Any other registration phrase restarts at the terms screen
            if is_registration_intent(text) {
                return Some(enter_terms(ctx));
            }
            if let Some(outcome) = forced_exit(profile, text, ctx) {
                return Some(outcome);
            }

            let Some(value) = validate(field, text, ValidationMode::Registration) else {
                return Some(StepOutcome::new(
                    session.clone(),
                    vec![Effect::temp(ctx.messages.invalid(field), render::cancel_keyboard())],
                ));
            };

            let mut next = session.clone();
            next.data.set(field, value);

            match field.next() {
                Some(following) => {
                    next.state = FlowState::Register(following);
                    let (preview_text, preview_kb) = render::preview(&next.data, ctx.messages);
                    Some(StepOutcome::new(
                        next,
                        vec![
                            Effect::keep(preview_text, preview_kb),
                            prompt_effect(following, ctx),
                        ],
                    ))
                }
                // The last field completes the flow: one atomic upsert
                None => Some(complete_registration(&next, ctx)),
            }
        }
    }
}

fn edit_menu_step(
    session: &Session,
    profile: Option<&Profile>,
    event: &FlowEvent,
    ctx: &FlowContext<'_>,
) -> Option<StepOutcome> {
    if let Some(token) = event.as_callback() {
        if token == labels::FINALIZE_TOKEN {
            return Some(finalize(session, ctx, CommitMode::Edit));
        }
        let target = render::field_from_token(token)?;
        return Some(jump_to_field(session, target, ctx, CommitMode::Edit));
    }

    let text = event.as_text()?;
    if text == labels::CANCEL {
        return Some(StepOutcome::new(
            Session::idle(),
            vec![menu_screen(profile, ctx)],
        ));
    }
    if is_registration_intent(text) {
        return Some(enter_terms(ctx));
    }
    forced_exit(profile, text, ctx)
}

fn edit_field_step(
    field: ProfileField,
    session: &Session,
    profile: Option<&Profile>,
    event: &FlowEvent,
    ctx: &FlowContext<'_>,
) -> Option<StepOutcome> {
    let text = event.as_text()?;

    if text == labels::CANCEL {
        return Some(StepOutcome::new(
            Session::idle(),
            vec![menu_screen(profile, ctx)],
        ));
    }
    if is_registration_intent(text) {
        return Some(enter_terms(ctx));
    }
    if let Some(outcome) = forced_exit(profile, text, ctx) {
        return Some(outcome);
    }

    let Some(value) = validate(field, text, ValidationMode::Edit) else {
        return Some(StepOutcome::new(
            session.clone(),
            vec![Effect::temp(ctx.messages.invalid(field), render::cancel_keyboard())],
        ));
    };

    let mut next = session.clone();
    next.data.set(field, value);
    next.state = FlowState::EditMenu;

    let (menu_text, menu_kb) = render::edit_menu(&next.data, ctx.messages);
    let patch = next.data.field_patch(field);

    // Edit commits are immediate and single-field; the record must exist
    Some(StepOutcome::with_write(
        next,
        vec![Effect::keep(menu_text, menu_kb)],
        ProfileWrite::Update { patch },
    ))
}

fn tariff_step(
    tier: &str,
    session: &Session,
    profile: Option<&Profile>,
    event: &FlowEvent,
    ctx: &FlowContext<'_>,
) -> Option<StepOutcome> {
    let text = event.as_text()?;

    match text {
        labels::PURCHASE => {
            let patch = ProfilePatch {
                tariff_name: Some(tier.to_string()),
                ..Default::default()
            };
            Some(StepOutcome::with_write(
                Session::idle(),
                vec![Effect::keep(
                    ctx.messages.tariff_purchased(tier),
                    render::client_menu(),
                )],
                ProfileWrite::Upsert { patch },
            ))
        }
        labels::BACK => Some(StepOutcome::new(
            Session::idle(),
            vec![menu_screen(profile, ctx)],
        )),
        _ => {
            if is_registration_intent(text) {
                return Some(enter_terms(ctx));
            }
            if let Some(outcome) = forced_exit(profile, text, ctx) {
                return Some(outcome);
            }
            // Re-selection: another tier name replaces the pending one
            let other = ctx.tariffs.find(text)?;
            let mut next = session.clone();
            next.state = FlowState::TariffSelected(other.name.clone());
            Some(StepOutcome::new(
                next,
                vec![Effect::keep(&other.description, render::purchase_keyboard())],
            ))
        }
    }
}

/// Which flow a redirect or finalize belongs to; it decides the state
/// constructor and, for finalize, what completion means
#[derive(Clone, Copy)]
enum CommitMode {
    Registration,
    Edit,
}

impl CommitMode {
    fn field_state(&self, field: ProfileField) -> FlowState {
        match self {
            Self::Registration => FlowState::Register(field),
            Self::Edit => FlowState::EditField(field),
        }
    }
}

/// Jump to editing `target`, unless an earlier field is still unset, in
/// which case redirect there instead
fn jump_to_field(
    session: &Session,
    target: ProfileField,
    ctx: &FlowContext<'_>,
    mode: CommitMode,
) -> StepOutcome {
    match session.data.first_missing_before(target) {
        Some(missing) => StepOutcome::new(
            session.with_state(mode.field_state(missing)),
            vec![
                Effect::alert(&ctx.messages.fill_previous_first),
                prompt_effect(missing, ctx),
            ],
        ),
        None => StepOutcome::new(
            session.with_state(mode.field_state(target)),
            vec![Effect::Ack, prompt_effect(target, ctx)],
        ),
    }
}

/// The submit action: redirect to the first missing field, or complete
fn finalize(session: &Session, ctx: &FlowContext<'_>, mode: CommitMode) -> StepOutcome {
    if let Some(missing) = session.data.first_missing() {
        return StepOutcome::new(
            session.with_state(mode.field_state(missing)),
            vec![
                Effect::alert(&ctx.messages.fill_all_first),
                prompt_effect(missing, ctx),
            ],
        );
    }

    match mode {
        CommitMode::Registration => {
            let mut outcome = complete_registration(session, ctx);
            outcome.effects.insert(0, Effect::Ack);
            outcome
        }
        CommitMode::Edit => {
            // Edits were already committed per field; finishing just
            // leaves the flow
            StepOutcome::new(
                Session::idle(),
                vec![
                    Effect::Ack,
                    Effect::keep(&ctx.messages.client_menu, render::client_menu()),
                ],
            )
        }
    }
}

/// Terminal registration commit: the whole field set in one upsert
fn complete_registration(session: &Session, ctx: &FlowContext<'_>) -> StepOutcome {
    StepOutcome::with_write(
        Session::idle(),
        vec![
            Effect::temp(&ctx.messages.registration_complete, Keyboard::Empty),
            Effect::keep(&ctx.messages.client_menu, render::client_menu()),
        ],
        ProfileWrite::Upsert {
            patch: session.data.to_patch(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitbot_core::UserId;

    struct Fixture {
        messages: Messages,
        tariffs: Tariffs,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                messages: Messages::default(),
                tariffs: Tariffs::default(),
            }
        }

        fn ctx(&self) -> FlowContext<'_> {
            FlowContext {
                messages: &self.messages,
                tariffs: &self.tariffs,
            }
        }
    }

    fn in_state(state: FlowState) -> Session {
        let mut session = Session::idle();
        session.state = state;
        session
    }

    fn has_alert(effects: &[Effect], needle: &str) -> bool {
        effects
            .iter()
            .any(|e| matches!(e, Effect::Alert { text } if text.contains(needle)))
    }

    #[test]
    fn test_register_trigger_enters_terms() {
        let fx = Fixture::new();
        let outcome = step(
            &Session::idle(),
            None,
            &FlowEvent::text("Register"),
            &fx.ctx(),
        )
        .unwrap();
        assert_eq!(outcome.session.state, FlowState::AwaitingTerms);
        assert!(outcome.write.is_none());
    }

    #[test]
    fn test_unmatched_text_at_idle_is_ignored() {
        let fx = Fixture::new();
        assert!(step(
            &Session::idle(),
            None,
            &FlowEvent::text("random chatter"),
            &fx.ctx()
        )
        .is_none());
    }

    #[test]
    fn test_accept_terms_upserts_and_prompts_first_name() {
        let fx = Fixture::new();
        let outcome = step(
            &in_state(FlowState::AwaitingTerms),
            None,
            &FlowEvent::text("Accept"),
            &fx.ctx(),
        )
        .unwrap();

        assert_eq!(
            outcome.session.state,
            FlowState::Register(ProfileField::FirstName)
        );
        match outcome.write {
            Some(ProfileWrite::Upsert { patch }) => assert_eq!(patch.agreed_terms, Some(true)),
            other => panic!("expected upsert, got {:?}", other),
        }
    }

    #[test]
    fn test_decline_clears_session() {
        let fx = Fixture::new();
        let outcome = step(
            &in_state(FlowState::AwaitingTerms),
            None,
            &FlowEvent::text("Decline"),
            &fx.ctx(),
        )
        .unwrap();
        assert!(outcome.session.state.is_idle());
        assert!(outcome.write.is_none());
    }

    #[test]
    fn test_happy_path_full_registration() {
        let fx = Fixture::new();
        let ctx = fx.ctx();

        let mut session = Session::idle();
        for (text, next_state) in [
            ("Register", FlowState::AwaitingTerms),
            ("Accept", FlowState::Register(ProfileField::FirstName)),
            ("anna", FlowState::Register(ProfileField::LastName)),
            ("smith", FlowState::Register(ProfileField::Email)),
            ("a@b.com", FlowState::Register(ProfileField::Phone)),
            ("+7 999 123 45 67", FlowState::Register(ProfileField::HeightCm)),
            ("170", FlowState::Register(ProfileField::WeightKg)),
            ("62,5", FlowState::Register(ProfileField::Age)),
        ] {
            let outcome = step(&session, None, &FlowEvent::text(text), &ctx).unwrap();
            assert_eq!(outcome.session.state, next_state, "after {:?}", text);
            session = outcome.session;
        }

        let outcome = step(&session, None, &FlowEvent::text("29"), &ctx).unwrap();
        assert!(outcome.session.state.is_idle());
        assert_eq!(outcome.session.data, FormData::default());

        match outcome.write {
            Some(ProfileWrite::Upsert { patch }) => {
                assert_eq!(patch.first_name.as_deref(), Some("Anna"));
                assert_eq!(patch.last_name.as_deref(), Some("Smith"));
                assert_eq!(patch.email.as_deref(), Some("a@b.com"));
                assert_eq!(patch.weight_kg, Some(62.5));
                assert_eq!(patch.age, Some(29));
            }
            other => panic!("expected terminal upsert, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input_reprompts_without_advancing() {
        let fx = Fixture::new();
        let session = in_state(FlowState::Register(ProfileField::Email));

        let outcome = step(&session, None, &FlowEvent::text("not-an-email"), &fx.ctx()).unwrap();
        assert_eq!(outcome.session.state, FlowState::Register(ProfileField::Email));
        assert!(outcome.session.data.email.is_none());
        assert!(outcome.write.is_none());
    }

    #[test]
    fn test_phone_text_at_first_name_does_not_misfile() {
        let fx = Fixture::new();
        let session = in_state(FlowState::Register(ProfileField::FirstName));

        let outcome = step(&session, None, &FlowEvent::text("+79991234567"), &fx.ctx()).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::Register(ProfileField::FirstName)
        );
        assert!(outcome.session.data.phone.is_none());
        assert!(outcome.session.data.first_name.is_none());
    }

    #[test]
    fn test_register_button_mid_flow_hints_instead_of_restarting() {
        let fx = Fixture::new();
        let mut session = in_state(FlowState::Register(ProfileField::Phone));
        session.data.first_name = Some("Anna".into());

        let outcome = step(&session, None, &FlowEvent::text("Register"), &fx.ctx()).unwrap();
        assert_eq!(outcome.session, session);
        assert!(outcome.effects.iter().any(|e| matches!(
            e,
            Effect::SendTemp { text, .. } if text == &fx.messages.continue_hint
        )));
    }

    #[test]
    fn test_intent_phrase_mid_flow_restarts_at_terms() {
        let fx = Fixture::new();
        let ctx = fx.ctx();

        // Not the button label, so no continue-hint carve-out: the phrase
        // must never reach the name validator
        let mut session = in_state(FlowState::Register(ProfileField::FirstName));
        let outcome = step(&session, None, &FlowEvent::text("Registration"), &ctx).unwrap();
        assert_eq!(outcome.session.state, FlowState::AwaitingTerms);
        assert!(outcome.session.data.first_name.is_none());

        // Same restart out of an edit field, dropping collected data
        session = in_state(FlowState::EditField(ProfileField::LastName));
        session.data.first_name = Some("Anna".into());
        let outcome = step(&session, None, &FlowEvent::text("Registration"), &ctx).unwrap();
        assert_eq!(outcome.session.state, FlowState::AwaitingTerms);
        assert_eq!(outcome.session.data, FormData::default());

        // And out of a pending tariff selection
        session = in_state(FlowState::TariffSelected("Basic".into()));
        let outcome = step(&session, None, &FlowEvent::text("I want to register"), &ctx).unwrap();
        assert_eq!(outcome.session.state, FlowState::AwaitingTerms);
    }

    #[test]
    fn test_back_at_idle_returns_to_menu() {
        let fx = Fixture::new();
        let mut profile = Profile::new(UserId(1));
        profile.tariff_name = Some("Basic".into());

        let outcome = step(
            &Session::idle(),
            Some(&profile),
            &FlowEvent::text("Back to menu"),
            &fx.ctx(),
        )
        .unwrap();
        assert!(outcome.session.state.is_idle());
        assert!(outcome.effects.iter().any(|e| matches!(
            e,
            Effect::SendKeep { text, .. } if text == &fx.messages.client_menu
        )));
    }

    #[test]
    fn test_profile_card_offers_edit_and_back() {
        let fx = Fixture::new();
        let profile = Profile::new(UserId(1));

        let outcome = step(
            &Session::idle(),
            Some(&profile),
            &FlowEvent::text("Profile"),
            &fx.ctx(),
        )
        .unwrap();
        match outcome.effects.first() {
            Some(Effect::SendKeep { keyboard, .. }) => {
                assert_eq!(keyboard, &render::profile_keyboard());
            }
            other => panic!("expected profile card, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_callback_mid_registration_is_ignored() {
        let fx = Fixture::new();
        let session = in_state(FlowState::Register(ProfileField::FirstName));
        assert!(step(&session, None, &FlowEvent::callback("bogus"), &fx.ctx()).is_none());
    }

    #[test]
    fn test_cancel_mid_registration_returns_to_menu() {
        let fx = Fixture::new();
        let mut session = in_state(FlowState::Register(ProfileField::Email));
        session.data.first_name = Some("Anna".into());

        let outcome = step(&session, None, &FlowEvent::text("Cancel"), &fx.ctx()).unwrap();
        assert!(outcome.session.state.is_idle());
        assert_eq!(outcome.session.data, FormData::default());
    }

    #[test]
    fn test_forced_exit_abandons_registration() {
        let fx = Fixture::new();
        let mut session = in_state(FlowState::Register(ProfileField::HeightCm));
        session.data.first_name = Some("Anna".into());

        let outcome = step(&session, None, &FlowEvent::text("Menu"), &fx.ctx()).unwrap();
        assert!(outcome.session.state.is_idle());
        assert_eq!(outcome.session.data, FormData::default());
    }

    #[test]
    fn test_preview_jump_respects_predecessor_order() {
        let fx = Fixture::new();
        let mut session = in_state(FlowState::Register(ProfileField::FirstName));
        session.data.first_name = Some("Anna".into());

        // last_name unset, so jumping to email redirects there first
        let outcome = step(&session, None, &FlowEvent::callback("edit_email"), &fx.ctx()).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::Register(ProfileField::LastName)
        );
        assert!(has_alert(&outcome.effects, &fx.messages.fill_previous_first));
    }

    #[test]
    fn test_edit_jump_redirects_to_missing_predecessor() {
        let fx = Fixture::new();
        let mut session = in_state(FlowState::EditMenu);
        session.data.first_name = Some("Anna".into());

        let outcome = step(&session, None, &FlowEvent::callback("edit_email"), &fx.ctx()).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::EditField(ProfileField::LastName)
        );
        assert!(has_alert(&outcome.effects, &fx.messages.fill_previous_first));
    }

    #[test]
    fn test_edit_jump_with_predecessors_set_enters_target() {
        let fx = Fixture::new();
        let mut session = in_state(FlowState::EditMenu);
        session.data.first_name = Some("Anna".into());
        session.data.last_name = Some("Smith".into());

        let outcome = step(&session, None, &FlowEvent::callback("edit_email"), &fx.ctx()).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::EditField(ProfileField::Email)
        );
    }

    #[test]
    fn test_finalize_redirects_to_first_missing_field() {
        let fx = Fixture::new();
        let ctx = fx.ctx();

        let mut data = FormData {
            first_name: Some("Anna".into()),
            last_name: Some("Smith".into()),
            email: Some("a@b.com".into()),
            phone: Some("+79991234567".into()),
            height_cm: Some(170),
            weight_kg: None,
            age: Some(29),
        };

        // Same redirect from the registration preview...
        let mut session = in_state(FlowState::Register(ProfileField::Age));
        session.data = data.clone();
        let outcome = step(&session, None, &FlowEvent::callback("finalize"), &ctx).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::Register(ProfileField::WeightKg)
        );
        assert!(outcome.write.is_none());

        // ...and from the edit menu
        let mut session = in_state(FlowState::EditMenu);
        session.data = data.clone();
        let outcome = step(&session, None, &FlowEvent::callback("finalize"), &ctx).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::EditField(ProfileField::WeightKg)
        );

        // Complete data finalizes the registration in one upsert
        data.weight_kg = Some(62.5);
        let mut session = in_state(FlowState::Register(ProfileField::Age));
        session.data = data;
        let outcome = step(&session, None, &FlowEvent::callback("finalize"), &ctx).unwrap();
        assert!(outcome.session.state.is_idle());
        assert!(matches!(outcome.write, Some(ProfileWrite::Upsert { .. })));
    }

    #[test]
    fn test_edit_commit_is_immediate_and_single_field() {
        let fx = Fixture::new();
        let mut session = in_state(FlowState::EditField(ProfileField::WeightKg));
        session.data.first_name = Some("Anna".into());

        let outcome = step(&session, None, &FlowEvent::text("82.5"), &fx.ctx()).unwrap();
        assert_eq!(outcome.session.state, FlowState::EditMenu);
        match outcome.write {
            Some(ProfileWrite::Update { patch }) => {
                assert_eq!(patch.weight_kg, Some(82.5));
                assert!(patch.first_name.is_none());
            }
            other => panic!("expected single-field update, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_uses_narrower_ranges() {
        let fx = Fixture::new();
        let session = in_state(FlowState::EditField(ProfileField::HeightCm));

        // 119 is valid in registration but not in edit mode
        let outcome = step(&session, None, &FlowEvent::text("119"), &fx.ctx()).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::EditField(ProfileField::HeightCm)
        );
        assert!(outcome.session.data.height_cm.is_none());

        let outcome = step(&session, None, &FlowEvent::text("230"), &fx.ctx()).unwrap();
        assert_eq!(outcome.session.data.height_cm, Some(230));
    }

    #[test]
    fn test_edit_requires_existing_profile() {
        let fx = Fixture::new();
        let outcome = step(
            &Session::idle(),
            None,
            &FlowEvent::text("Edit data"),
            &fx.ctx(),
        )
        .unwrap();
        assert!(outcome.session.state.is_idle());
        assert!(outcome.effects.iter().any(|e| matches!(
            e,
            Effect::SendTemp { text, .. } if text == &fx.messages.profile_not_found
        )));
    }

    #[test]
    fn test_edit_entry_seeds_data_from_profile() {
        let fx = Fixture::new();
        let mut profile = Profile::new(UserId(1));
        profile.first_name = Some("Anna".into());
        profile.height_cm = Some(170);

        let outcome = step(
            &Session::idle(),
            Some(&profile),
            &FlowEvent::text("Edit data"),
            &fx.ctx(),
        )
        .unwrap();
        assert_eq!(outcome.session.state, FlowState::EditMenu);
        assert_eq!(outcome.session.data.first_name.as_deref(), Some("Anna"));
        assert_eq!(outcome.session.data.height_cm, Some(170));
    }

    #[test]
    fn test_tariff_selection_and_purchase() {
        let fx = Fixture::new();
        let ctx = fx.ctx();

        let outcome = step(&Session::idle(), None, &FlowEvent::text("Basic"), &ctx).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::TariffSelected("Basic".into())
        );

        // Another tier name replaces the pending selection
        let outcome = step(&outcome.session, None, &FlowEvent::text("Maximum"), &ctx).unwrap();
        assert_eq!(
            outcome.session.state,
            FlowState::TariffSelected("Maximum".into())
        );

        let outcome = step(&outcome.session, None, &FlowEvent::text("Purchase"), &ctx).unwrap();
        assert!(outcome.session.state.is_idle());
        match outcome.write {
            Some(ProfileWrite::Upsert { patch }) => {
                assert_eq!(patch.tariff_name.as_deref(), Some("Maximum"));
            }
            other => panic!("expected tariff upsert, got {:?}", other),
        }
    }

    #[test]
    fn test_tariff_button_shows_owned_tier() {
        let fx = Fixture::new();
        let mut profile = Profile::new(UserId(1));
        profile.tariff_name = Some("Basic".into());

        let outcome = step(
            &Session::idle(),
            Some(&profile),
            &FlowEvent::text("Tariff"),
            &fx.ctx(),
        )
        .unwrap();
        assert!(outcome.session.state.is_idle());
        assert!(outcome.effects.iter().any(|e| matches!(
            e,
            Effect::SendKeep { text, .. } if text.contains("Basic")
        )));
    }

    #[test]
    fn test_start_greets_by_registration_status() {
        let fx = Fixture::new();
        let ctx = fx.ctx();

        let outcome = step(&Session::idle(), None, &FlowEvent::Start, &ctx).unwrap();
        assert!(outcome.effects.iter().any(|e| matches!(
            e,
            Effect::SendKeep { text, .. } if text == &fx.messages.welcome_new
        )));

        let profile = Profile::new(UserId(1));
        let outcome = step(&Session::idle(), Some(&profile), &FlowEvent::Start, &ctx).unwrap();
        assert!(outcome.effects.iter().any(|e| matches!(
            e,
            Effect::SendKeep { text, .. } if text == &fx.messages.welcome_back
        )));
    }
}
