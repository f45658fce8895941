//! Tutor command handlers.

use petadmin_core::validate::{format_cpf, format_phone};
use petadmin_core::{
    Registry, Related, StoreHook, Tutor, TutorDetail, TutorFacade, TutorInput, use_store,
};
use tabled::Tabled;

use crate::cli::{GlobalOpts, TutorsArgs, TutorsCommand};
use crate::error::CliError;
use crate::output::{self, Detail};

use super::pets::PetRow;
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct TutorRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "CPF")]
    cpf: String,
}

impl From<&Tutor> for TutorRow {
    fn from(t: &Tutor) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            phone: format_phone(&t.phone),
            email: t.email.clone().unwrap_or_default(),
            cpf: t.cpf.as_deref().map(format_cpf).unwrap_or_default(),
        }
    }
}

fn summary(t: &Tutor, color: bool) -> Detail {
    Detail::new(color)
        .field("ID", t.id)
        .field("Name", &t.name)
        .field("Phone", format_phone(&t.phone))
        .optional("Email", t.email.as_deref())
        .optional("Address", t.address.as_deref())
        .field("CPF", t.cpf.as_deref().map_or_else(|| "-".into(), format_cpf))
        .optional("Photo", t.photo.as_ref().map(|p| p.url.as_str()))
}

fn detail(d: &TutorDetail, color: bool) -> String {
    let pets: Vec<PetRow> = d.pets.iter().map(PetRow::from).collect();
    summary(&d.tutor, color).section("Pets", &pets).finish()
}

/// Print the tutor the store refreshed after a link change.
fn print_selected(
    hook: &StoreHook<TutorFacade>,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    util::check_store(hook)?;
    if let Some(tutor) = hook.state().selected.as_ref() {
        let out = output::render_single(
            global.output,
            tutor,
            |d| detail(d, color),
            |d| {
                d.related_ids()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        )?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    registry: &Registry,
    args: TutorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let hook = use_store(registry.tutors());
    let color = output::should_color(global.color);

    match args.command {
        TutorsCommand::List(list) => {
            let tutors =
                util::with_spinner(global, "Loading tutors", util::collect_list(&hook, &list))
                    .await?;
            let out = output::render_list(
                global.output,
                &tutors,
                |t| TutorRow::from(t),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TutorsCommand::Get { id } => {
            let tutor =
                util::with_spinner(global, "Loading tutor", util::fetch_detail(&hook, id)).await?;
            let out = output::render_single(
                global.output,
                &tutor,
                |d| detail(d, color),
                |d| d.tutor.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TutorsCommand::Create {
            name,
            phone,
            email,
            address,
            cpf,
            photo,
        } => {
            let input = TutorInput {
                name,
                email,
                phone,
                address,
                cpf,
                photo: util::read_photo(photo.as_deref())?,
            };
            let tutor = hook.create(input)
                .await
                .map_err(|e| util::write_error(&hook, e))?;
            util::status(global, &format!("Tutor {} created", tutor.id));
            let out = output::render_single(
                global.output,
                &tutor,
                |t| summary(t, color).finish(),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TutorsCommand::Update {
            id,
            name,
            phone,
            email,
            address,
            cpf,
            photo,
        } => {
            let current = util::fetch_detail(&hook, id).await?.tutor;
            let input = TutorInput {
                name: name.unwrap_or(current.name),
                email: email.or(current.email),
                phone: phone.unwrap_or(current.phone),
                address: address.or(current.address),
                cpf: cpf.or(current.cpf),
                photo: util::read_photo(photo.as_deref())?,
            };
            let tutor = hook.update(id, input)
                .await
                .map_err(|e| util::write_error(&hook, e))?;
            util::status(global, &format!("Tutor {} updated", tutor.id));
            let out = output::render_single(
                global.output,
                &tutor,
                |t| summary(t, color).finish(),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TutorsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete tutor {id}?"), global.yes)? {
                return Ok(());
            }
            hook.delete(id)
                .await
                .map_err(|e| util::write_error(&hook, e))?;
            util::status(global, &format!("Tutor {id} deleted"));
            Ok(())
        }

        TutorsCommand::Link { tutor, pet } => {
            hook.link(tutor, pet)
                .await
                .map_err(|e| util::write_error(&hook, e))?;
            util::status(global, &format!("Pet {pet} linked to tutor {tutor}"));
            print_selected(&hook, global, color)
        }

        TutorsCommand::Unlink { tutor, pet } => {
            if !util::confirm(&format!("Remove pet {pet} from tutor {tutor}?"), global.yes)? {
                return Ok(());
            }
            hook.unlink(tutor, pet)
                .await
                .map_err(|e| util::write_error(&hook, e))?;
            util::status(global, &format!("Pet {pet} unlinked from tutor {tutor}"));
            print_selected(&hook, global, color)
        }
    }
}
