use crate::infra::{read_json_file, InMemoryCaseGateway};
use casebook::config::AppConfig;
use casebook::error::AppError;
use casebook::workflows::case::{
    effective_step, is_debrief_complete, ActionContext, CaseBoard, CaseId, CaseRecord,
    CaseWorkflowService, CaseWorkflowView, CloseCaseInput, DebriefInput, HighlightTracker,
    PreparationInput,
};
use casebook::workflows::coaching::{
    coaching_suggestion, CoachingSuggestion, DimensionScores, LeaderEvaluation,
    LeaderEvaluationDraft, StudentId,
};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Args, Debug)]
pub(crate) struct CaseViewArgs {
    /// Case snapshot as returned by the backend (JSON)
    #[arg(long)]
    pub(crate) case: PathBuf,
    /// Optional debrief draft (JSON) to evaluate instead of the stored one
    #[arg(long)]
    pub(crate) debrief: Option<PathBuf>,
    /// Treat a request as in flight, disabling the primary action
    #[arg(long)]
    pub(crate) loading: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CoachingSuggestArgs {
    /// Evaluation history (JSON array, newest first)
    #[arg(long)]
    pub(crate) history: PathBuf,
    /// Student to advise; omit for the generic recommendation
    #[arg(long)]
    pub(crate) target: Option<i64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the highlight pulse length in milliseconds
    #[arg(long)]
    pub(crate) highlight_ms: Option<u64>,
    /// Reporting date for the leader evaluation (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the coaching portion of the demo.
    #[arg(long)]
    pub(crate) skip_coaching: bool,
}

pub(crate) fn run_case_view(args: CaseViewArgs) -> Result<(), AppError> {
    let case: CaseRecord = read_json_file(&args.case)?;
    let mut context = ActionContext::for_case(&case).loading(args.loading);
    if let Some(path) = args.debrief {
        context.draft_debrief = read_json_file::<DebriefInput>(&path)?;
    }

    let view = CaseWorkflowView::build(&case, &context);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

pub(crate) fn run_coaching_suggest(args: CoachingSuggestArgs) -> Result<(), AppError> {
    let history: Vec<LeaderEvaluation> = read_json_file(&args.history)?;
    let suggestion = coaching_suggestion(&history, args.target.map(StudentId));
    render_suggestion(&suggestion);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        highlight_ms,
        today,
        skip_coaching,
    } = args;

    let config = AppConfig::load()?;
    let duration = highlight_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.workflow.highlight_duration());
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Casebook workflow demo");
    run_case_walkthrough(duration)?;

    if !skip_coaching {
        run_coaching_walkthrough(today)?;
    }

    Ok(())
}

fn run_case_walkthrough(highlight: Duration) -> Result<(), AppError> {
    let id = CaseId(1);
    let created_at = Utc::now() - chrono::Duration::days(3);
    let mut case = CaseRecord::new(id, "Renegociación de alquiler", created_at);
    case.confidence_start = Some(4);

    let gateway = Arc::new(InMemoryCaseGateway::with_cases([case.clone()]));
    let service = CaseWorkflowService::new(gateway.clone());
    let mut tracker = HighlightTracker::new(highlight);
    let started = Instant::now();
    let mut tick = 0u32;
    let mut observe = |case: &CaseRecord, tracker: &mut HighlightTracker| {
        tick += 1;
        let now = started + highlight / 2 * tick;
        let step = effective_step(case.status, is_debrief_complete(&case.debrief));
        let fired = tracker.observe(case.id, step, now);
        render_case(case, fired.then_some(step.label()));
    };

    observe(&case, &mut tracker);

    case = service.save_preparation(&case, &demo_preparation())?;
    println!("  Preparation saved; status stays until the backend review.");
    observe(&case, &mut tracker);

    case = gateway.mark_prepared(id)?;
    println!("  Backend review marked the case as prepared.");
    observe(&case, &mut tracker);

    case = service.confirm_execution(&case)?;
    observe(&case, &mut tracker);

    match service.close_case(&case, &CloseCaseInput::default()) {
        Ok(_) => println!("  Unexpected: case closed without debrief"),
        Err(err) => println!("  Close refused: {}", err.user_message()),
    }

    let mut debrief = DebriefInput::with_required(
        "  Logrado, con plazo de 24 meses ",
        " Anclar con datos de mercado antes de la primera oferta ",
    );
    debrief.self_diagnosis.decision_to_change =
        "Pedir la contraoferta por escrito".to_string();
    case = service.save_debrief(&case, &debrief)?;
    observe(&case, &mut tracker);

    let metrics = CloseCaseInput {
        confidence_end: 8,
        agreement_quality_result: 4,
        agreement_quality_relationship: 5,
        agreement_quality_sustainability: 4,
    };
    case = service.close_case(&case, &metrics)?;
    observe(&case, &mut tracker);

    if let Some(memo) = &case.final_memo {
        println!("\nFinal memo");
        println!("- {}", memo.strategic_synthesis);
        println!("- Principle: {}", memo.consolidated_transferable_principle);
        for entry in &memo.observations_and_next_steps {
            println!("- Next: {}", entry);
        }
    }

    let items = gateway.list()?;
    let board = CaseBoard::from_items(&items);
    println!(
        "\nCase board ({} total, {} pending debrief)",
        board.total, board.pending_debrief
    );
    for entry in &board.by_status {
        println!("  - {}: {}", entry.status_label, entry.count);
    }

    Ok(())
}

fn run_coaching_walkthrough(today: NaiveDate) -> Result<(), AppError> {
    let student = StudentId(42);
    let history = demo_history(student, today);

    println!("\nLeader evaluation advisor (student #{student})");
    render_suggestion(&coaching_suggestion(&history, Some(student)));

    let draft = LeaderEvaluationDraft::for_target(student).with_suggested_next_action(&history);
    let payload = draft.into_payload(today)?;
    println!(
        "  Draft ready for period {}: next action prefilled ({} chars)",
        payload.period_label.as_deref().unwrap_or("-"),
        payload.next_action.chars().count()
    );

    match LeaderEvaluationDraft::default().validate(today) {
        Ok(_) => println!("  Unexpected: draft without student accepted"),
        Err(err) => println!("  Draft without student refused: {}", err),
    }

    Ok(())
}

fn render_case(case: &CaseRecord, pulse: Option<&str>) {
    let view = CaseWorkflowView::build(case, &ActionContext::for_case(case));
    println!(
        "\n[{}] {} -> next: {} ({}{})",
        view.status_label,
        view.title,
        view.primary_action.label,
        if view.primary_action.disabled {
            "disabled"
        } else {
            "enabled"
        },
        pulse
            .map(|step| format!(", highlight {step}"))
            .unwrap_or_default()
    );
    let track: Vec<String> = view
        .steps
        .iter()
        .map(|step| format!("{}: {}", step.label, step.state_label))
        .collect();
    println!("  {}", track.join(" | "));

    if let Some(delta) = view.confidence_delta {
        println!("  Confidence delta: {delta:+}");
    }
    if let Some(days) = view.cycle_days {
        println!("  Cycle time: {days} days");
    }
}

fn render_suggestion(suggestion: &CoachingSuggestion) {
    if !suggestion.averages.is_empty() {
        println!(
            "  Averages over {} evaluation(s):",
            suggestion.evaluations_considered
        );
        for entry in &suggestion.averages {
            println!("  - {}: {:.2}", entry.label, entry.average);
        }
    }
    if let Some(weakest) = suggestion.weakest {
        println!("  Weakest dimension: {}", weakest.label());
    }
    println!("  Suggested next action: {}", suggestion.next_action);
}

fn demo_preparation() -> PreparationInput {
    let mut preparation = PreparationInput::default();
    preparation.objective.explicit_objective = "Renovar con un aumento menor al 8%".to_string();
    preparation.objective.minimum_acceptable_result = "Aumento del 12% a 24 meses".to_string();
    preparation.power_alternatives.maan = "Oficina compartida en el mismo barrio".to_string();
    preparation.strategy.concession_sequence = "Plazo, luego depósito, último precio".to_string();
    preparation.risk.main_risk = "Que el propietario ya tenga otro inquilino".to_string();
    preparation
}

fn demo_history(student: StudentId, today: NaiveDate) -> Vec<LeaderEvaluation> {
    let entries = [
        DimensionScores {
            preparation_score: 4,
            execution_score: 3,
            collaboration_score: 4,
            autonomy_score: 2,
            confidence_score: 3,
        },
        DimensionScores {
            preparation_score: 3,
            execution_score: 3,
            collaboration_score: 5,
            autonomy_score: 2,
            confidence_score: 4,
        },
        DimensionScores::uniform(3),
    ];

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, scores)| {
            let offset = chrono::Duration::weeks(4 * index as i64);
            let created_at = (today - offset).and_hms_opt(10, 0, 0)?;
            Some(LeaderEvaluation {
                id: index as i64 + 1,
                evaluator_user_id: 1,
                target_user_id: student,
                cohort_id: None,
                follow_up_date: None,
                period_label: created_at.format("%Y-%m").to_string(),
                scores,
                summary_note: String::new(),
                next_action: String::new(),
                created_at,
            })
        })
        .collect()
}
