//! The encounter state machine: orchestration, turn queue, forced intents,
//! victory checks, fault handling. Each `step` call advances exactly one
//! transition of §4.10's state diagram and returns the events that
//! transition produced.

use crate::actions::{self, ActionContext};
use crate::combatant::Combatant;
use crate::config::EngineConfig;
use crate::dice::DiceService;
use crate::effect::{self, Effect, SlotTable};
use crate::error::{EngineError, EngineFault, UsageFault};
use crate::events::{Event, Outcome};
use crate::ids::Side;
use crate::intent::{ActionChoice, Intent};
use crate::spells::{self, ALL_LIVING_OPPONENTS};
use crate::tactical::{RandomMeleeProvider, TacticalProvider};
use crate::view::{CombatView, CombatantView, SideThenIdTiebreak, TiebreakPolicy};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// The finite set of encounter states, in the order transitions move
/// through them within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterState {
    Init,
    RoundStart,
    TurnStart,
    AwaitIntent,
    ValidateIntent,
    ExecuteAction,
    ApplyEffects,
    CheckDeaths,
    CheckMorale,
    CheckVictory,
    Ended,
}

impl EncounterState {
    pub fn name(&self) -> &'static str {
        match self {
            EncounterState::Init => "Init",
            EncounterState::RoundStart => "RoundStart",
            EncounterState::TurnStart => "TurnStart",
            EncounterState::AwaitIntent => "AwaitIntent",
            EncounterState::ValidateIntent => "ValidateIntent",
            EncounterState::ExecuteAction => "ExecuteAction",
            EncounterState::ApplyEffects => "ApplyEffects",
            EncounterState::CheckDeaths => "CheckDeaths",
            EncounterState::CheckMorale => "CheckMorale",
            EncounterState::CheckVictory => "CheckVictory",
            EncounterState::Ended => "Ended",
        }
    }
}

/// The result of a single `step` call: the events that one transition
/// produced, and where the engine stands afterward.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub state: EncounterState,
    pub needs_intent: bool,
    pub pending_combatant_id: Option<String>,
    pub events: Vec<Event>,
}

/// The core state-driven encounter runner. Owns all mutable context;
/// external consumers interact only through `step`/`step_until_decision`,
/// `get_view`, and `queue_forced_intent`.
pub struct Engine {
    encounter_id: String,
    combatants: HashMap<String, Box<dyn Combatant>>,
    dice: Box<dyn DiceService>,
    tactical_provider: Box<dyn TacticalProvider>,
    tiebreak: Box<dyn TiebreakPolicy>,
    config: EngineConfig,

    state: EncounterState,
    round_no: u32,
    turn_queue: VecDeque<String>,
    current_combatant_id: Option<String>,
    slots: SlotTable,
    forced_intents: HashMap<String, (Intent, Option<String>)>,
    announced_deaths: BTreeSet<String>,
    initiative_by_id: HashMap<String, i64>,
    outcome: Option<Outcome>,
    party_surprised: bool,
    opposition_surprised: bool,

    pending_intent: Option<Intent>,
    pending_intent_was_forced: bool,
    pending_effects: Vec<Effect>,
    pending_queued_events: Vec<Event>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("encounter_id", &self.encounter_id)
            .field("state", &self.state)
            .field("round_no", &self.round_no)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        encounter_id: impl Into<String>,
        party: Vec<Box<dyn Combatant>>,
        opposition: Vec<Box<dyn Combatant>>,
        dice: Box<dyn DiceService>,
        tactical_provider: Option<Box<dyn TacticalProvider>>,
        config: EngineConfig,
    ) -> Self {
        let mut combatants = HashMap::new();
        for c in party.into_iter().chain(opposition.into_iter()) {
            combatants.insert(c.id().to_string(), c);
        }
        Self {
            encounter_id: encounter_id.into(),
            combatants,
            dice,
            tactical_provider: tactical_provider.unwrap_or_else(|| Box::new(RandomMeleeProvider)),
            tiebreak: Box::new(SideThenIdTiebreak),
            config,
            state: EncounterState::Init,
            round_no: 0,
            turn_queue: VecDeque::new(),
            current_combatant_id: None,
            slots: SlotTable::new(),
            forced_intents: HashMap::new(),
            announced_deaths: BTreeSet::new(),
            initiative_by_id: HashMap::new(),
            outcome: None,
            party_surprised: false,
            opposition_surprised: false,
            pending_intent: None,
            pending_intent_was_forced: false,
            pending_effects: Vec::new(),
            pending_queued_events: Vec::new(),
        }
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// A read-only structural snapshot of the current encounter.
    pub fn get_view(&self) -> CombatView {
        let combatants = self
            .combatants
            .values()
            .map(|c| CombatantView {
                id: c.id().to_string(),
                name: c.display_name().to_string(),
                side: c.side(),
                alive: c.is_alive(),
                hp: c.current_hp(),
                max_hp: c.max_hp(),
                initiative: self.initiative_by_id.get(c.id()).copied().unwrap_or(0),
            })
            .collect();
        CombatView {
            round_no: self.round_no,
            current_id: self.current_combatant_id.clone(),
            combatants,
            announced_deaths: self.announced_deaths.clone(),
        }
    }

    /// Queue an intent that bypasses normal decision-making the next time
    /// this combatant reaches `TurnStart`. Errors if the encounter ended.
    pub fn queue_forced_intent(
        &mut self,
        combatant_id: impl Into<String>,
        intent: Intent,
        reason: Option<String>,
    ) -> Result<(), EngineError> {
        if self.state == EncounterState::Ended {
            return Err(UsageFault::EncounterEnded.into());
        }
        let combatant_id = combatant_id.into();
        self.pending_queued_events
            .push(Event::ForcedIntentQueued { id: combatant_id.clone(), kind: intent.clone() });
        self.forced_intents.insert(combatant_id, (intent, reason));
        Ok(())
    }

    /// Advance the encounter by exactly one transition.
    pub fn step(&mut self, intent: Option<Intent>) -> Result<StepResult, EngineError> {
        if self.state == EncounterState::Ended {
            return Ok(self.terminal_result());
        }

        if self.state != EncounterState::AwaitIntent {
            if intent.is_some() {
                return Err(UsageFault::WrongState { expected: "AwaitIntent", actual: self.state.name() }.into());
            }
        } else if let Some(supplied) = &intent {
            let expected = self.current_combatant_id.clone().unwrap_or_default();
            if supplied.actor_id() != expected {
                return Err(UsageFault::CombatantMismatch {
                    expected,
                    actual: supplied.actor_id().to_string(),
                }
                .into());
            }
        }

        let mut events = std::mem::take(&mut self.pending_queued_events);

        if self.state == EncounterState::AwaitIntent {
            match intent {
                Some(supplied) => {
                    self.pending_intent = Some(supplied);
                    self.pending_intent_was_forced = false;
                    self.state = EncounterState::ValidateIntent;
                }
                None => {
                    return Ok(StepResult {
                        state: self.state,
                        needs_intent: true,
                        pending_combatant_id: self.current_combatant_id.clone(),
                        events,
                    });
                }
            }
        } else if let Err(fault) = self.advance(&mut events) {
            log::warn!("encounter {} faulted in {}: {fault}", self.encounter_id, self.state.name());
            events.push(Event::EncounterFaulted {
                state: self.state.name().to_string(),
                actor_id: self.current_combatant_id.clone(),
                error_kind: fault.kind_name().to_string(),
                message: fault.to_string(),
            });
            self.outcome = Some(Outcome::Faulted);
            self.state = EncounterState::Ended;
        }

        Ok(StepResult {
            state: self.state,
            needs_intent: self.state == EncounterState::AwaitIntent,
            pending_combatant_id: self.current_combatant_id.clone(),
            events,
        })
    }

    /// Repeatedly `step` until a decision point, terminal state, or
    /// `max_steps` is reached. Exhaustion faults the encounter and is
    /// surfaced as an error.
    pub fn step_until_decision(
        &mut self,
        intent: Option<Intent>,
        max_steps: u32,
    ) -> Result<Vec<StepResult>, EngineError> {
        let mut results = Vec::new();
        let mut next_intent = intent;
        for _ in 0..max_steps {
            let result = self.step(next_intent.take())?;
            let done = result.needs_intent || result.state == EncounterState::Ended;
            results.push(result);
            if done {
                return Ok(results);
            }
        }
        self.outcome = Some(Outcome::Faulted);
        self.state = EncounterState::Ended;
        Err(EngineError::Faulted(EngineFault::StepBudgetExhausted { max_steps }))
    }

    fn terminal_result(&self) -> StepResult {
        StepResult { state: EncounterState::Ended, needs_intent: false, pending_combatant_id: None, events: Vec::new() }
    }

    fn advance(&mut self, events: &mut Vec<Event>) -> Result<(), EngineFault> {
        match self.state {
            EncounterState::Init => self.advance_init(events),
            EncounterState::RoundStart => self.advance_round_start(events),
            EncounterState::TurnStart => self.advance_turn_start(events),
            EncounterState::ValidateIntent => self.advance_validate_intent(events),
            EncounterState::ExecuteAction => self.advance_execute_action(events),
            EncounterState::ApplyEffects => self.advance_apply_effects(events),
            EncounterState::CheckDeaths => {
                self.advance_check_deaths(events);
                Ok(())
            }
            EncounterState::CheckMorale => {
                self.state = EncounterState::CheckVictory;
                Ok(())
            }
            EncounterState::CheckVictory => {
                self.advance_check_victory(events);
                Ok(())
            }
            EncounterState::AwaitIntent | EncounterState::Ended => {
                unreachable!("handled before advance() is reached")
            }
        }
    }

    fn advance_init(&mut self, events: &mut Vec<Event>) -> Result<(), EngineFault> {
        events.push(Event::EncounterStarted { encounter_id: self.encounter_id.clone() });
        if self.config.roll_surprise {
            let party_roll = self.dice.roll("1d6")?;
            let opposition_roll = self.dice.roll("1d6")?;
            self.party_surprised = party_roll <= 2;
            self.opposition_surprised = opposition_roll <= 2;
            events.push(Event::SurpriseRolled {
                party_surprised: self.party_surprised,
                opposition_surprised: self.opposition_surprised,
                party_roll,
                opposition_roll,
            });
        }
        self.state = EncounterState::RoundStart;
        Ok(())
    }

    fn side_is_surprised(&self, side: Side) -> bool {
        match side {
            Side::Party => self.party_surprised,
            Side::Opposition => self.opposition_surprised,
        }
    }

    fn advance_round_start(&mut self, events: &mut Vec<Event>) -> Result<(), EngineFault> {
        self.round_no += 1;
        log::info!("encounter {}: round {} starting", self.encounter_id, self.round_no);
        let party_roll = self.dice.roll("1d6")?;
        let opposition_roll = self.dice.roll("1d6")?;
        let side_roll = |side: Side| if side == Side::Party { party_roll } else { opposition_roll };

        let mut views: Vec<CombatantView> = self
            .combatants
            .values()
            .filter(|c| !(self.round_no == 1 && self.side_is_surprised(c.side())))
            .map(|c| CombatantView {
                id: c.id().to_string(),
                name: c.display_name().to_string(),
                side: c.side(),
                alive: c.is_alive(),
                hp: c.current_hp(),
                max_hp: c.max_hp(),
                initiative: side_roll(c.side()) + c.initiative_modifier() as i64,
            })
            .collect();
        views.sort_by(|a, b| b.initiative.cmp(&a.initiative).then_with(|| self.tiebreak.order(a, b)));

        self.initiative_by_id = views.iter().map(|v| (v.id.clone(), v.initiative)).collect();
        let order: Vec<(String, i64)> = views.iter().map(|v| (v.id.clone(), v.initiative)).collect();
        let queue: Vec<String> = views.iter().map(|v| v.id.clone()).collect();

        events.push(Event::RoundStarted { round_no: self.round_no });
        events.push(Event::InitiativeRolled { order });
        events.push(Event::TurnQueueBuilt { queue: queue.clone() });
        self.turn_queue = queue.into();
        self.state = EncounterState::TurnStart;
        Ok(())
    }

    fn advance_turn_start(&mut self, events: &mut Vec<Event>) -> Result<(), EngineFault> {
        loop {
            let Some(id) = self.turn_queue.pop_front() else {
                self.state = EncounterState::RoundStart;
                return Ok(());
            };
            let Some(combatant) = self.combatants.get(&id) else {
                events.push(Event::TurnSkipped { id, reason: "combatant no longer exists".to_string() });
                continue;
            };
            if !combatant.is_alive() {
                events.push(Event::TurnSkipped { id, reason: "dead".to_string() });
                continue;
            }

            self.current_combatant_id = Some(id.clone());
            log::debug!("turn start: {id}");
            events.push(Event::TurnStarted { id: id.clone() });

            if let Some((intent, _reason)) = self.forced_intents.remove(&id) {
                events.push(Event::ForcedIntentApplied { id: id.clone(), kind: intent.clone() });
                self.pending_intent = Some(intent);
                self.pending_intent_was_forced = true;
                self.state = EncounterState::ValidateIntent;
            } else {
                self.begin_decision(&id, events)?;
            }
            return Ok(());
        }
    }

    /// The normal decision path for one combatant: the tactical provider for
    /// opposition (or every combatant in auto-resolve mode), or a `NeedAction`
    /// choice menu for a party member. Used both at a fresh `TurnStart` and
    /// as the re-decision point after a rejected intent (forced or not).
    fn begin_decision(&mut self, actor_id: &str, events: &mut Vec<Event>) -> Result<(), EngineFault> {
        let side = self
            .combatants
            .get(actor_id)
            .map(|c| c.side())
            .ok_or_else(|| EngineFault::MissingCombatant(actor_id.to_string()))?;

        self.pending_intent_was_forced = false;

        if self.config.auto_resolve || side == Side::Opposition {
            let view = self.get_view();
            let intent = self.tactical_provider.choose_intent(&view, actor_id, self.dice.as_mut())?;
            self.pending_intent = Some(intent);
            self.state = EncounterState::ValidateIntent;
        } else {
            let available = self.build_choices(actor_id);
            events.push(Event::NeedAction { id: actor_id.to_string(), available });
            self.pending_intent = None;
            self.state = EncounterState::AwaitIntent;
        }
        Ok(())
    }

    fn build_choices(&self, actor_id: &str) -> Vec<ActionChoice> {
        let Some(actor) = self.combatants.get(actor_id) else { return Vec::new() };
        let side = actor.side();

        let mut opponent_ids: Vec<String> = self
            .combatants
            .values()
            .filter(|c| c.side() != side && c.is_alive())
            .map(|c| c.id().to_string())
            .collect();
        opponent_ids.sort();

        let mut choices = Vec::new();

        for target_id in &opponent_ids {
            let mut args = BTreeMap::new();
            args.insert("target".to_string(), target_id.clone());
            choices.push(ActionChoice::new(
                "melee_attack",
                args,
                Intent::MeleeAttack { actor_id: actor_id.to_string(), target_id: target_id.clone() },
            ));
        }

        if actor.weapon().map(|w| w.ranged_damage_die.is_some()).unwrap_or(false) {
            for target_id in &opponent_ids {
                let mut args = BTreeMap::new();
                args.insert("target".to_string(), target_id.clone());
                choices.push(ActionChoice::new(
                    "ranged_attack",
                    args,
                    Intent::RangedAttack { actor_id: actor_id.to_string(), target_id: target_id.clone() },
                ));
            }
        }

        if let Some(caster) = actor.as_spellcaster() {
            for spell in spells::all_spells() {
                if !spell.usable_by(caster.caster_class()) {
                    continue;
                }
                if spell.num_targets == ALL_LIVING_OPPONENTS || spell.self_target {
                    let mut args = BTreeMap::new();
                    args.insert("spell_id".to_string(), spell.spell_id.to_string());
                    choices.push(ActionChoice::new(
                        "cast_spell",
                        args,
                        Intent::CastSpell {
                            actor_id: actor_id.to_string(),
                            spell_id: spell.spell_id.to_string(),
                            slot_level: spell.level,
                            target_ids: Vec::new(),
                        },
                    ));
                } else {
                    for target_id in &opponent_ids {
                        let mut args = BTreeMap::new();
                        args.insert("spell_id".to_string(), spell.spell_id.to_string());
                        args.insert("target".to_string(), target_id.clone());
                        choices.push(ActionChoice::new(
                            "cast_spell",
                            args,
                            Intent::CastSpell {
                                actor_id: actor_id.to_string(),
                                spell_id: spell.spell_id.to_string(),
                                slot_level: spell.level,
                                target_ids: vec![target_id.clone()],
                            },
                        ));
                    }
                }
            }
        }

        choices.push(ActionChoice::new("flee", BTreeMap::new(), Intent::Flee { actor_id: actor_id.to_string() }));
        choices
    }

    fn advance_validate_intent(&mut self, events: &mut Vec<Event>) -> Result<(), EngineFault> {
        let intent = self
            .pending_intent
            .clone()
            .ok_or_else(|| EngineFault::Internal("ValidateIntent reached with no pending intent".to_string()))?;
        let current = self.current_combatant_id.clone().unwrap_or_default();
        let ctx = ActionContext { combatants: &self.combatants, current_combatant_id: &current };
        let rejections = actions::validate_intent(&intent, &ctx);

        if rejections.is_empty() {
            self.state = EncounterState::ExecuteAction;
            return Ok(());
        }

        let actor_id = intent.actor_id().to_string();
        events.push(Event::ActionRejected { id: actor_id.clone(), reasons: rejections });
        self.pending_intent = None;
        self.begin_decision(&actor_id, events)
    }

    fn advance_execute_action(&mut self, events: &mut Vec<Event>) -> Result<(), EngineFault> {
        let intent = self
            .pending_intent
            .clone()
            .ok_or_else(|| EngineFault::Internal("ExecuteAction reached with no pending intent".to_string()))?;
        let current = self.current_combatant_id.clone().unwrap_or_default();
        let ctx = ActionContext { combatants: &self.combatants, current_combatant_id: &current };
        let result = actions::execute_intent(&intent, &ctx, self.dice.as_mut())?;
        events.extend(result.events);
        self.pending_effects = result.effects;
        self.state = EncounterState::ApplyEffects;
        Ok(())
    }

    fn advance_apply_effects(&mut self, events: &mut Vec<Event>) -> Result<(), EngineFault> {
        let effects = std::mem::take(&mut self.pending_effects);
        let (mutation_events, rejection) = effect::apply_effects(&effects, &mut self.combatants, &mut self.slots);
        events.extend(mutation_events);

        if let Some(rejection) = rejection {
            let actor_id = self.current_combatant_id.clone().unwrap_or_default();
            events.push(Event::ActionRejected { id: actor_id.clone(), reasons: vec![rejection] });
            self.pending_intent = None;
            self.begin_decision(&actor_id, events)
        } else {
            self.state = EncounterState::CheckDeaths;
            Ok(())
        }
    }

    fn advance_check_deaths(&mut self, events: &mut Vec<Event>) {
        let mut newly_dead: Vec<String> = self
            .combatants
            .values()
            .filter(|c| !c.is_alive() && !self.announced_deaths.contains(c.id()))
            .map(|c| c.id().to_string())
            .collect();
        newly_dead.sort();
        for id in newly_dead {
            self.announced_deaths.insert(id.clone());
            events.push(Event::EntityDied { entity_id: id });
        }
        self.state = EncounterState::CheckMorale;
    }

    fn advance_check_victory(&mut self, events: &mut Vec<Event>) {
        let party_alive = self.combatants.values().any(|c| c.side() == Side::Party && c.is_alive());
        let opposition_alive = self.combatants.values().any(|c| c.side() == Side::Opposition && c.is_alive());

        let outcome = if !party_alive {
            Some(Outcome::OppositionVictory)
        } else if !opposition_alive {
            Some(Outcome::PartyVictory)
        } else {
            None
        };

        self.current_combatant_id = None;
        self.pending_intent = None;
        self.pending_intent_was_forced = false;

        if let Some(outcome) = outcome {
            self.outcome = Some(outcome);
            log::info!("encounter {} ended: {outcome:?}", self.encounter_id);
            events.push(Event::VictoryDetermined { outcome });
            self.state = EncounterState::Ended;
        } else if !self.turn_queue.is_empty() {
            self.state = EncounterState::TurnStart;
        } else {
            self.state = EncounterState::RoundStart;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CasterClass, SimpleCombatant};
    use crate::dice::FixedDice;
    use crate::events::{Outcome, RejectionCode};

    fn goblin(hp: i64) -> Box<dyn Combatant> {
        Box::new(SimpleCombatant::new("monster:Goblin:0", Side::Opposition, hp, 6, 19))
    }

    fn hero() -> Box<dyn Combatant> {
        Box::new(SimpleCombatant::new("pc:Hero", Side::Party, 10, 15, 16).with_weapon("1d8", None))
    }

    fn engine_with(party: Vec<Box<dyn Combatant>>, opposition: Vec<Box<dyn Combatant>>, rolls: Vec<i64>) -> Engine {
        let mut config = EngineConfig::default();
        config.roll_surprise = false;
        Engine::new("enc-1", party, opposition, Box::new(FixedDice::new(rolls)), None, config)
    }

    #[test]
    fn scenario_one_pc_kills_one_hp_goblin() {
        // Init, RoundStart (tied 5/5 initiative rolls, party wins the tiebreak
        // and acts first), then the hero's melee attack: nat-20 to-hit, 1d8
        // damage roll of 6.
        let mut engine = engine_with(vec![hero()], vec![goblin(1)], vec![5, 5, 20, 6]);

        let results = engine.step_until_decision(None, 64).unwrap();
        let last = results.last().unwrap();
        assert!(last.needs_intent);
        assert_eq!(last.pending_combatant_id.as_deref(), Some("pc:Hero"));

        let intent = Intent::MeleeAttack { actor_id: "pc:Hero".to_string(), target_id: "monster:Goblin:0".to_string() };
        let results = engine.step_until_decision(Some(intent), 64).unwrap();
        let all_events: Vec<&Event> = results.iter().flat_map(|r| r.events.iter()).collect();

        assert!(all_events.iter().any(|e| matches!(e, Event::AttackRolled { hit: true, critical: true, .. })));
        assert!(all_events
            .iter()
            .any(|e| matches!(e, Event::DamageApplied { target_hp_after: 0, .. })));
        assert!(all_events.iter().any(|e| matches!(e, Event::EntityDied { entity_id } if entity_id == "monster:Goblin:0")));
        assert!(all_events
            .iter()
            .any(|e| matches!(e, Event::VictoryDetermined { outcome: Outcome::PartyVictory })));
        assert_eq!(engine.outcome(), Some(Outcome::PartyVictory));
    }

    #[test]
    fn scenario_flee_rejection_falls_back_to_need_action() {
        // Tied initiative so the party acts first and the forced intent
        // lands on the hero's own turn rather than the goblin's.
        let mut engine = engine_with(vec![hero()], vec![goblin(7)], vec![5, 5]);
        engine
            .queue_forced_intent("pc:Hero", Intent::Flee { actor_id: "pc:Hero".to_string() }, None)
            .unwrap();

        let results = engine.step_until_decision(None, 64).unwrap();
        let all_events: Vec<&Event> = results.iter().flat_map(|r| r.events.iter()).collect();

        assert!(all_events.iter().any(|e| matches!(e, Event::ForcedIntentApplied { id, .. } if id == "pc:Hero")));
        assert!(all_events.iter().any(|e| matches!(
            e,
            Event::ActionRejected { reasons, .. } if reasons[0].code == RejectionCode::FleeNotImplemented
        )));
        let last = results.last().unwrap();
        assert!(last.needs_intent);
        assert!(matches!(all_events.last().unwrap(), Event::NeedAction { .. }));
    }

    #[test]
    fn wrong_state_intent_is_a_usage_fault() {
        let mut engine = engine_with(vec![hero()], vec![goblin(7)], vec![3, 5]);
        // Still in Init; supplying an intent before any AwaitIntent is a usage error.
        let intent = Intent::MeleeAttack { actor_id: "pc:Hero".to_string(), target_id: "monster:Goblin:0".to_string() };
        let err = engine.step(Some(intent)).unwrap_err();
        assert!(matches!(err, EngineError::Usage(UsageFault::WrongState { .. })));
    }

    #[test]
    fn ended_encounter_step_is_a_no_op() {
        let mut engine = engine_with(vec![hero()], vec![goblin(1)], vec![5, 5, 20, 6]);
        engine.step_until_decision(None, 64).unwrap();
        let intent = Intent::MeleeAttack { actor_id: "pc:Hero".to_string(), target_id: "monster:Goblin:0".to_string() };
        engine.step_until_decision(Some(intent), 64).unwrap();
        assert_eq!(engine.state(), EncounterState::Ended);

        let result = engine.step(None).unwrap();
        assert!(result.events.is_empty());
        assert_eq!(result.state, EncounterState::Ended);
    }

    #[test]
    fn spell_cast_consumes_a_slot_and_applies_damage() {
        let wizard = Box::new(
            SimpleCombatant::new("pc:Wizard", Side::Party, 4, 11, 19).with_caster(CasterClass::MagicUser, &[(1, 1)]),
        ) as Box<dyn Combatant>;
        // tied initiative so the wizard acts first; damage roll 1d4+1 = 2+1.
        let mut engine = engine_with(vec![wizard], vec![goblin(20)], vec![5, 5, 2]);

        engine.step_until_decision(None, 64).unwrap();
        let cast = Intent::CastSpell {
            actor_id: "pc:Wizard".to_string(),
            spell_id: "magic_missile".to_string(),
            slot_level: 1,
            target_ids: vec!["monster:Goblin:0".to_string()],
        };
        let results = engine.step_until_decision(Some(cast), 64).unwrap();
        let events: Vec<&Event> = results.iter().flat_map(|r| r.events.iter()).collect();
        assert!(events.iter().any(|e| matches!(e, Event::SpellSlotConsumed { remaining: 0, .. })));
        assert!(events.iter().any(|e| matches!(e, Event::DamageApplied { .. })));
    }
}
