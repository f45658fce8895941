//! Pet command handlers.

use petadmin_core::{Pet, PetDetail, PetInput, Registry, use_store};
use tabled::Tabled;

use crate::cli::{GlobalOpts, PetsArgs, PetsCommand};
use crate::error::CliError;
use crate::output::{self, Detail};

use super::tutors::TutorRow;
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct PetRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Breed")]
    breed: String,
    #[tabled(rename = "Age")]
    age: u32,
    #[tabled(rename = "Photo")]
    photo: &'static str,
}

impl From<&Pet> for PetRow {
    fn from(p: &Pet) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            breed: p.breed.clone(),
            age: p.age,
            photo: util::yes_no(p.photo.is_some()),
        }
    }
}

fn detail(d: &PetDetail, color: bool) -> String {
    let pet = &d.pet;
    let tutors: Vec<TutorRow> = d.tutors.iter().map(TutorRow::from).collect();
    Detail::new(color)
        .field("ID", pet.id)
        .field("Name", &pet.name)
        .field("Breed", if pet.breed.is_empty() { "-" } else { pet.breed.as_str() })
        .field("Age", pet.age)
        .optional("Photo", pet.photo.as_ref().map(|p| p.url.as_str()))
        .section("Tutors", &tutors)
        .finish()
}

fn summary(p: &Pet, color: bool) -> String {
    Detail::new(color)
        .field("ID", p.id)
        .field("Name", &p.name)
        .field("Breed", &p.breed)
        .field("Age", p.age)
        .finish()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    registry: &Registry,
    args: PetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let hook = use_store(registry.pets());
    let color = output::should_color(global.color);

    match args.command {
        PetsCommand::List(list) => {
            let pets =
                util::with_spinner(global, "Loading pets", util::collect_list(&hook, &list))
                    .await?;
            let out = output::render_list(
                global.output,
                &pets,
                |p| PetRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PetsCommand::Get { id } => {
            let pet = util::with_spinner(global, "Loading pet", util::fetch_detail(&hook, id))
                .await?;
            let out = output::render_single(
                global.output,
                &pet,
                |d| detail(d, color),
                |d| d.pet.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PetsCommand::Create {
            name,
            breed,
            age,
            photo,
        } => {
            let input = PetInput {
                name,
                breed,
                age,
                photo: util::read_photo(photo.as_deref())?,
            };
            let pet = hook.create(input)
                .await
                .map_err(|e| util::write_error(&hook, e))?;
            util::status(global, &format!("Pet {} created", pet.id));
            let out = output::render_single(
                global.output,
                &pet,
                |p| summary(p, color),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PetsCommand::Update {
            id,
            name,
            breed,
            age,
            photo,
        } => {
            let current = util::fetch_detail(&hook, id).await?.pet;
            let input = PetInput {
                name: name.unwrap_or(current.name),
                breed: breed.unwrap_or(current.breed),
                age: age.unwrap_or(current.age),
                photo: util::read_photo(photo.as_deref())?,
            };
            let pet = hook.update(id, input)
                .await
                .map_err(|e| util::write_error(&hook, e))?;
            util::status(global, &format!("Pet {} updated", pet.id));
            let out = output::render_single(
                global.output,
                &pet,
                |p| summary(p, color),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PetsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete pet {id}?"), global.yes)? {
                return Ok(());
            }
            hook.delete(id)
                .await
                .map_err(|e| util::write_error(&hook, e))?;
            util::status(global, &format!("Pet {id} deleted"));
            Ok(())
        }
    }
}
