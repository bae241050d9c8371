use opencred::error::AppError;
use opencred::lending::intake::Registration;
use tracing::info;

use super::prompt_lines;
use crate::cli::RegisterArgs;

/// Check sign-up details. Passwords are read from stdin so they stay out of shell history.
pub(crate) async fn run(args: RegisterArgs) -> Result<(), AppError> {
    let mut lines = prompt_lines();
    println!("Password:");
    let password = lines.next_line().await?.unwrap_or_default();
    println!("Confirm password:");
    let confirm_password = lines.next_line().await?.unwrap_or_default();

    let registration = registration(args, password, confirm_password);
    registration.validate()?;
    info!(email = %registration.email, "registration details accepted");
    println!("Registration successful! Start an application with `opencred apply`.");
    Ok(())
}

fn registration(args: RegisterArgs, password: String, confirm_password: String) -> Registration {
    Registration {
        full_name: args.name.unwrap_or_default(),
        email: args.email.unwrap_or_default(),
        phone: args.phone.unwrap_or_default(),
        pan: args.pan.unwrap_or_default(),
        password,
        confirm_password,
        agree_to_terms: args.agree_terms,
    }
}
