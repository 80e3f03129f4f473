use crate::cli::opts::*;
use crate::config::{open_store, AppConfig};
use crate::shell::{study, Shell};
use crate::transfer;

use anyhow::{bail, Context, Result};
use flashdeck_core::{CoreError, Workspace};
use flashdeck_text::paths;
use std::io::{stdin, stdout};

pub async fn run_cli(args: Cli) -> Result<()> {
    let config = AppConfig::from_cli(&args);
    let cmd = args.cmd.clone().unwrap_or(Command::Shell);

    // Users are directories, not store contents.
    if let Command::User(cmd) = cmd {
        return user_cmd(&config, cmd);
    }

    let store = open_store(&config).await.map_err(|e| match e {
        CoreError::StorageUnavailable(_) if config.store == StoreKind::Text => {
            anyhow::Error::new(e).context(format!(
                "cannot open decks of user {:?}; create them with `flashdeck user add {}`",
                config.user, config.user
            ))
        }
        other => anyhow::Error::new(other).context("cannot open store"),
    })?;
    let mut ws = Workspace::new(store);

    if let Command::Shell = cmd {
        let input = stdin().lock();
        return Shell::new(config, ws, input, stdout()).run().await;
    }

    let res = match cmd {
        Command::Deck(cmd) => deck_cmd(&mut ws, cmd).await,
        Command::Card(cmd) => card_cmd(&mut ws, cmd).await,
        Command::Study { deck } => study_cmd(&mut ws, &deck).await,
        Command::Export(cmd) => export_cmd(&ws, cmd).await,
        Command::Import(cmd) => import_cmd(&mut ws, cmd).await,
        Command::Shell | Command::User(_) => unreachable!(),
    };
    let closed = ws.close().await;
    res?;
    closed?;
    Ok(())
}

fn user_cmd(config: &AppConfig, cmd: UserCmd) -> Result<()> {
    if config.store != StoreKind::Text {
        bail!("users are only supported by the text store");
    }
    match cmd {
        UserCmd::Add { name } => {
            let dir = paths::create_user(&config.data_dir, &name)?;
            println!("{}", dir.display());
        }
        UserCmd::List => {
            for u in paths::list_users(&config.data_dir)? {
                println!("{u}");
            }
        }
    }
    Ok(())
}

async fn deck_cmd(ws: &mut Workspace, cmd: DeckCmd) -> Result<()> {
    match cmd {
        DeckCmd::Add { name } => {
            ws.create_deck(&name).await?;
            println!("created {name}");
        }
        DeckCmd::List => {
            for name in ws.list_decks().await? {
                println!("{name}");
            }
        }
        DeckCmd::Rm { name } => {
            ws.delete_deck(&name).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn card_cmd(ws: &mut Workspace, cmd: CardCmd) -> Result<()> {
    match cmd {
        CardCmd::Add(a) => {
            ws.load_deck(&a.deck).await?;
            match ws.add_card(&a.front, &a.back).await? {
                None => println!("added"),
                Some(old) => println!("updated (was: {old})"),
            }
        }
        CardCmd::List { deck } => {
            ws.load_deck(&deck).await?;
            for c in ws.cards()? {
                println!("{}\t{}", c.front, c.back);
            }
        }
        CardCmd::Rm { deck, front } => {
            ws.load_deck(&deck).await?;
            ws.remove_card(&front).await?;
            println!("ok");
        }
        CardCmd::Clear { deck } => {
            ws.load_deck(&deck).await?;
            let n = ws.clear_cards().await?;
            println!("removed {n}");
        }
    }
    if ws.is_dirty() {
        ws.save().await?;
    }
    Ok(())
}

async fn study_cmd(ws: &mut Workspace, deck: &str) -> Result<()> {
    ws.load_deck(deck).await?;
    let mut session = ws.start_session()?;
    study::run(&mut session, &mut stdin().lock(), &mut stdout())?;
    Ok(())
}

async fn export_cmd(ws: &Workspace, cmd: ExportCmd) -> Result<()> {
    let (path, deck, json) = match cmd {
        ExportCmd::Json { path, deck } => (path, deck, true),
        ExportCmd::Csv { path, deck } => (path, deck, false),
    };
    let bundle = transfer::collect(&**ws.store(), deck.as_deref()).await?;
    if json {
        transfer::write_json(&bundle, &path)?;
    } else {
        transfer::write_csv(&bundle, &path)?;
    }
    println!("wrote {}", path.display());
    Ok(())
}

async fn import_cmd(ws: &mut Workspace, cmd: ImportCmd) -> Result<()> {
    let bundle = match cmd {
        ImportCmd::Json { path } => transfer::read_json(&path),
        ImportCmd::Csv { path, deck } => transfer::read_csv(&path, deck.as_deref()),
    }
    .context("reading import file")?;
    let report = transfer::import(ws, &bundle).await?;
    println!(
        "imported: {} new decks, {} cards added, {} updated",
        report.decks_created, report.cards_added, report.cards_updated
    );
    Ok(())
}
