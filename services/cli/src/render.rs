use opencred::lending::domain::{ChatMessage, PendingLoan, Sender};
use opencred::lending::tracking::{DisplayStep, ResultSummary, StepState};

pub(crate) fn print_step(step: &DisplayStep) {
    let marker = match step.state {
        StepState::Processing => " ...",
        StepState::Completed => "",
    };
    println!("  {} {}{}", step.icon, step.title, marker);
    if !step.description.is_empty() {
        println!("      {}", step.description);
    }
}

pub(crate) fn print_summary(summary: &ResultSummary) {
    println!("\n{} {} [{}]", summary.icon, summary.title, summary.status);
    if !summary.explanation.is_empty() {
        println!("{}", summary.explanation);
    }
    if summary.sanction_letter_issued {
        println!("A sanction letter has been issued. Print it with `opencred letter <loan-id>`.");
    }
}

pub(crate) fn print_chat_line(message: &ChatMessage) {
    println!("{}: {}", speaker(message.sender), message.text);
}

pub(crate) fn speaker(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::Bot => "Assistant",
        Sender::Manager => "Manager",
    }
}

pub(crate) fn print_pending(loan: &PendingLoan) {
    let submitted = loan
        .submitted_on()
        .map(|at| at.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|| loan.submitted_at.clone());
    println!(
        "- {} | {} ({}) | Rs. {:.0} requested | Rs. {:.0}/month | submitted {}",
        loan.loan_id, loan.data.name, loan.data.pan, loan.data.amount, loan.data.income, submitted
    );
    if !loan.ai_suggestion.is_empty() {
        let confidence = loan
            .ai_confidence
            .map(|value| format!(" ({value}% confidence)"))
            .unwrap_or_default();
        println!("    AI suggests: {}{}", loan.ai_suggestion, confidence);
    }
    if !loan.ai_explanation.is_empty() {
        println!("    {}", loan.ai_explanation);
    }
}
