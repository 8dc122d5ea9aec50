//! Interactive terminal input.

/// Read the keyring password from `env_var`, or prompt for it.
pub fn password_from_env_or_prompt(env_var: &str, prompt: &str) -> dialoguer::Result<String> {
    match std::env::var(env_var) {
        Ok(password) if !password.is_empty() => Ok(password),
        _ => read_password(prompt),
    }
}

pub fn read_password<T>(prompt: T) -> dialoguer::Result<String>
where
    T: ToString,
{
    dialoguer::Password::new()
        .with_prompt(prompt.to_string())
        .interact()
}

/// Prompt twice and require both entries to match.
pub fn read_new_password<T>(prompt: T) -> dialoguer::Result<String>
where
    T: ToString,
{
    dialoguer::Password::new()
        .with_prompt(prompt.to_string())
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()
}

pub fn read_text<T>(prompt: T) -> dialoguer::Result<String>
where
    T: ToString,
{
    dialoguer::Input::new()
        .with_prompt(prompt.to_string())
        .report(false)
        .interact_text()
}

pub fn confirm<T>(prompt: T) -> dialoguer::Result<bool>
where
    T: ToString,
{
    dialoguer::Confirm::new()
        .with_prompt(prompt.to_string())
        .interact()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_password_wins() {
        std::env::set_var("COSMOS_TRANSFER_TEST_PASSWORD", "from-env");
        let password =
            password_from_env_or_prompt("COSMOS_TRANSFER_TEST_PASSWORD", "unused").unwrap();
        assert_eq!(password, "from-env");
    }
}
