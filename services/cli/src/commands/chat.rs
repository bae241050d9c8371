use opencred::error::AppError;
use opencred::lending::assistant::ManagerChat;
use opencred::lending::LoanId;

use super::{is_exit, prompt_lines};
use crate::cli::{ChatArgs, Context};
use crate::render;

pub(crate) async fn run(context: &Context, args: ChatArgs) -> Result<(), AppError> {
    let mut chat = ManagerChat::new(LoanId(args.loan_id), &args.name);
    for message in chat.messages() {
        render::print_chat_line(message);
    }
    println!("(type 'exit' to leave)");

    let mut lines = prompt_lines();
    while let Some(line) = lines.next_line().await? {
        if is_exit(&line) {
            break;
        }
        if let Some(reply) = chat.send(context.backend.as_ref(), &line).await {
            let suffix = if reply.offline { " (offline)" } else { "" };
            println!("Manager{suffix}: {}", reply.text);
        }
    }
    Ok(())
}
