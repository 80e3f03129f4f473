//! Interactive command loop. Each command token maps to one handler; the
//! loop ends on `-q` or end of input.

use crate::cli::opts::StoreKind;
use crate::config::{open_store, AppConfig};
use anyhow::Result;
use flashdeck_core::{CoreError, Workspace};
use std::io::{BufRead, Write};
use tracing::debug;

pub mod study;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Test,
    Add,
    Delete,
    Print,
    Save,
    New,
    Load,
    Remove,
    List,
    User,
    Menu,
    Quit,
}

pub const COMMANDS: &[(&str, ShellCommand, &str)] = &[
    ("-t", ShellCommand::Test, "Test yourself"),
    ("-a", ShellCommand::Add, "Add a card"),
    ("-d", ShellCommand::Delete, "Delete a card"),
    ("-p", ShellCommand::Print, "Print full deck"),
    ("-s", ShellCommand::Save, "Save current deck"),
    ("-n", ShellCommand::New, "Create a new deck"),
    ("-l", ShellCommand::Load, "Load a saved deck"),
    ("-r", ShellCommand::Remove, "Remove a saved deck"),
    ("-ls", ShellCommand::List, "List saved decks"),
    ("-u", ShellCommand::User, "Select user"),
    ("-m", ShellCommand::Menu, "Display menu"),
    ("-q", ShellCommand::Quit, "Quit program"),
];

pub fn lookup(token: &str) -> Option<ShellCommand> {
    COMMANDS
        .iter()
        .find(|(t, _, _)| *t == token)
        .map(|(_, cmd, _)| *cmd)
}

enum Flow {
    Continue,
    Quit,
}

/// Prints `label`, then reads one line without its line terminator.
/// `None` means end of input.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> std::io::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

pub struct Shell<R, W> {
    config: AppConfig,
    workspace: Workspace,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(config: AppConfig, workspace: Workspace, input: R, out: W) -> Self {
        Self {
            config,
            workspace,
            input,
            out,
        }
    }

    /// Runs until quit or end of input, then releases the store.
    pub async fn run(mut self) -> Result<()> {
        let res = self.repl().await;
        let closed = self.workspace.close().await;
        res?;
        closed?;
        Ok(())
    }

    async fn repl(&mut self) -> Result<()> {
        writeln!(self.out, "Welcome to \"Terminal Flashcards\"!")?;
        self.print_menu()?;
        loop {
            let Some(line) = self.read("--> ")? else {
                writeln!(self.out)?;
                return Ok(());
            };
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            let Some(cmd) = lookup(token) else {
                writeln!(self.out, "Invalid response {token}")?;
                continue;
            };
            debug!(?cmd, "dispatch");
            match self.dispatch(cmd).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(e) => match e.downcast_ref::<CoreError>() {
                    Some(core) => writeln!(self.out, "{core}")?,
                    None => return Err(e),
                },
            }
        }
    }

    async fn dispatch(&mut self, cmd: ShellCommand) -> Result<Flow> {
        match cmd {
            ShellCommand::Test => self.test()?,
            ShellCommand::Add => self.add_card().await?,
            ShellCommand::Delete => self.delete_card().await?,
            ShellCommand::Print => self.print_deck()?,
            ShellCommand::Save => {
                self.workspace.save().await?;
                if let Some(name) = self.workspace.active_name() {
                    writeln!(self.out, "Saved {name}")?;
                }
            }
            ShellCommand::New => self.new_deck().await?,
            ShellCommand::Load => self.load_deck().await?,
            ShellCommand::Remove => self.remove_deck().await?,
            ShellCommand::List => self.list_decks().await?,
            ShellCommand::User => self.select_user().await?,
            ShellCommand::Menu => self.print_menu()?,
            ShellCommand::Quit => {
                self.offer_save("'-s' to save changes: ").await?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn read(&mut self, label: &str) -> std::io::Result<Option<String>> {
        prompt(&mut self.input, &mut self.out, label)
    }

    fn print_menu(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "Select a command below:")?;
        for (token, _, help) in COMMANDS {
            writeln!(self.out, "\t{token} {help}")?;
        }
        Ok(())
    }

    /// Asks to save when the active deck has unsaved changes.
    async fn offer_save(&mut self, label: &str) -> Result<()> {
        if !self.workspace.is_dirty() {
            return Ok(());
        }
        if self.read(label)?.as_deref().map(str::trim) == Some("-s") {
            self.workspace.save().await?;
            if let Some(name) = self.workspace.active_name() {
                writeln!(self.out, "Saved {name}")?;
            }
        }
        Ok(())
    }

    fn test(&mut self) -> Result<()> {
        let mut session = self.workspace.start_session()?;
        study::run(&mut session, &mut self.input, &mut self.out)?;
        Ok(())
    }

    async fn add_card(&mut self) -> Result<()> {
        let deck = self.active()?;
        let Some(front) = self.read("Enter front text: ")? else { return Ok(()) };
        let Some(back) = self.read("Enter back text: ")? else { return Ok(()) };
        match self.workspace.add_card(&front, &back).await? {
            None => writeln!(self.out, "{front} added to {deck}")?,
            Some(old) => writeln!(self.out, "{front} updated in {deck} (was: {old})")?,
        }
        Ok(())
    }

    async fn delete_card(&mut self) -> Result<()> {
        let deck = self.active()?;
        let Some(key) = self.read("Enter front text of card to be deleted or '-c' to empty deck:\n... ")? else {
            return Ok(());
        };
        if key.trim() == "-c" {
            let n = self.workspace.clear_cards().await?;
            writeln!(self.out, "All cards deleted ({n}).")?;
        } else {
            self.workspace.remove_card(&key).await?;
            writeln!(self.out, "Card {key} deleted from {deck}")?;
        }
        Ok(())
    }

    fn print_deck(&mut self) -> Result<()> {
        let deck = self.active()?;
        let cards = self.workspace.cards()?;
        if cards.is_empty() {
            writeln!(self.out, "{deck} has no cards.")?;
        }
        for (i, card) in cards.iter().enumerate() {
            writeln!(self.out, "Card {}:", i + 1)?;
            writeln!(self.out, "\tFront: {}", card.front)?;
            writeln!(self.out, "\tBack: {}", card.back)?;
        }
        Ok(())
    }

    async fn new_deck(&mut self) -> Result<()> {
        self.offer_save("Unsaved changes. '-s' to save them first: ").await?;
        let Some(name) = self.read("Enter new deck name: ")? else { return Ok(()) };
        let name = name.trim();
        self.workspace.create_deck(name).await?;
        writeln!(self.out, "Created deck {name}")?;
        writeln!(self.out, "Ready")?;
        Ok(())
    }

    async fn load_deck(&mut self) -> Result<()> {
        self.offer_save("Unsaved changes. '-s' to save them first: ").await?;
        let Some(name) = self.read("Enter deck name: ")? else { return Ok(()) };
        let name = name.trim();
        writeln!(self.out, "Loading deck {name}...")?;
        let count = self.workspace.load_deck(name).await?.len();
        writeln!(self.out, "Ready ({count} cards)")?;
        Ok(())
    }

    async fn remove_deck(&mut self) -> Result<()> {
        let Some(name) = self.read("Enter name of deck to delete: ")? else { return Ok(()) };
        let name = name.trim();
        let confirm = self.read(&format!("Delete {name} and all its cards? (y/N) "))?;
        if !matches!(confirm.as_deref().map(str::trim), Some("y") | Some("Y")) {
            writeln!(self.out, "Kept {name}")?;
            return Ok(());
        }
        let was_active = self.workspace.delete_deck(name).await?;
        writeln!(self.out, "Deleted deck {name}")?;
        if was_active {
            writeln!(self.out, "{name} was the active deck; load or create another.")?;
        }
        Ok(())
    }

    async fn list_decks(&mut self) -> Result<()> {
        let names = self.workspace.list_decks().await?;
        if names.is_empty() {
            writeln!(self.out, "No saved decks.")?;
        }
        let active = self.workspace.active_name().map(str::to_string);
        for name in names {
            let mark = if active.as_deref() == Some(name.as_str()) { "*" } else { " " };
            writeln!(self.out, "{mark} {name}")?;
        }
        Ok(())
    }

    async fn select_user(&mut self) -> Result<()> {
        if self.config.store != StoreKind::Text {
            writeln!(self.out, "Users are only supported by the text store.")?;
            return Ok(());
        }
        self.offer_save("Unsaved changes. '-s' to save them first: ").await?;
        let Some(user) = self.read("User: ")? else { return Ok(()) };
        let config = self.config.with_user(user.trim());
        // Open the new store first so a bad user keeps the current one.
        let store = open_store(&config).await?;
        let previous = std::mem::replace(&mut self.workspace, Workspace::new(store));
        previous.close().await?;
        writeln!(self.out, "Switched to user {}", config.user)?;
        self.config = config;
        Ok(())
    }

    fn active(&self) -> Result<String, CoreError> {
        self.workspace
            .active_name()
            .map(str::to_string)
            .ok_or(CoreError::NoActiveDeck)
    }
}
