//! CLI commands

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use clap::{Subcommand, ValueEnum};
use ellp_core::{
    CreateVolunteerRequest, CreateWorkshopRequest, LoginRequest, RegisterRequest,
    UpdateVolunteerRequest, UpdateWorkshopRequest, Volunteer, VolunteerFilter, Workshop,
    WorkshopFilter, matches_search, paginate,
};
use ellp_documents::{
    Document, batch_report, certificate, participation_report, participation_report_with_workshops,
};
use ellp_http::ApiClient;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::CliConfig;
use crate::display;

/// Shared state handed to every command
pub struct App {
    pub client: ApiClient,
    pub config: CliConfig,
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        email: String,

        #[arg(long, env = "ELLP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in
    Register {
        name: String,
        email: String,

        #[arg(long, env = "ELLP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Ask the server instead of using the cached profile
        #[arg(long)]
        refresh: bool,
    },

    /// Manage volunteers
    #[command(subcommand)]
    Volunteers(VolunteerCommands),

    /// Manage workshops
    #[command(subcommand)]
    Workshops(WorkshopCommands),

    /// Generate certificates and reports
    #[command(subcommand)]
    Documents(DocumentCommands),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusFilter {
    Active,
    Inactive,
}

impl StatusFilter {
    fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[derive(clap::Args)]
pub struct PageArgs {
    /// Case-insensitive name search
    #[arg(long, short)]
    search: Option<String>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Items per page (defaults to the configured page size)
    #[arg(long)]
    per_page: Option<usize>,
}

#[derive(Subcommand)]
pub enum VolunteerCommands {
    /// List volunteers
    List {
        #[arg(long)]
        status: Option<StatusFilter>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show one volunteer
    Get { id: String },

    /// Register a volunteer
    Create {
        name: String,
        email: String,

        #[arg(long)]
        phone: Option<String>,

        /// Volunteer is a student; requires --course and --ra
        #[arg(long)]
        academic: bool,

        #[arg(long)]
        course: Option<String>,

        #[arg(long)]
        ra: Option<String>,

        /// Entry date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        entry_date: Option<NaiveDate>,
    },

    /// Change volunteer fields
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        academic: Option<bool>,

        #[arg(long)]
        course: Option<String>,

        #[arg(long)]
        ra: Option<String>,

        #[arg(long)]
        entry_date: Option<NaiveDate>,
    },

    /// Delete a volunteer
    Delete { id: String },

    /// Mark a volunteer as having left
    Inactivate {
        id: String,

        /// Exit date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        exit_date: Option<NaiveDate>,
    },

    /// Link a workshop to a volunteer
    AddWorkshop {
        volunteer_id: String,
        workshop_id: String,
    },

    /// Unlink a workshop from a volunteer
    RemoveWorkshop {
        volunteer_id: String,
        workshop_id: String,
    },

    /// List the workshops a volunteer took part in
    Workshops { volunteer_id: String },
}

#[derive(Subcommand)]
pub enum WorkshopCommands {
    /// List workshops
    List {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        #[arg(long)]
        year: Option<i32>,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// Show one workshop
    Get { id: String },

    /// Create a workshop
    Create {
        name: String,

        /// Workshop date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        #[arg(long)]
        description: Option<String>,
    },

    /// Change workshop fields
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a workshop
    Delete { id: String },

    /// Link a volunteer to a workshop
    AddVolunteer {
        workshop_id: String,
        volunteer_id: String,
    },

    /// Unlink a volunteer from a workshop
    RemoveVolunteer {
        workshop_id: String,
        volunteer_id: String,
    },
}

#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Participation certificate for one volunteer
    Certificate {
        volunteer_id: String,

        /// Output directory (defaults to the configured one)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Participation report for one volunteer
    Report {
        volunteer_id: String,

        /// List workshop identifiers instead of looking up their names
        #[arg(long)]
        ids_only: bool,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Report covering every volunteer
    Batch {
        #[arg(long)]
        status: Option<StatusFilter>,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    pub async fn execute(self, app: &App) -> Result<()> {
        let auth = app.client.auth();
        match self {
            Commands::Login { email, password } => {
                let response = auth.login(&LoginRequest { email, password }).await?;
                match &response.user {
                    Some(user) => println!("Logged in as {}", user.name),
                    None => println!("Logged in"),
                }
                Ok(())
            }
            Commands::Register {
                name,
                email,
                password,
            } => {
                auth.register(&RegisterRequest {
                    name,
                    email,
                    password,
                })
                .await?;
                println!("Account created");
                Ok(())
            }
            Commands::Logout => {
                // The local session is gone either way
                if let Err(err) = auth.logout().await {
                    info!(error = %err, "server-side logout failed");
                }
                println!("Logged out");
                Ok(())
            }
            Commands::Whoami { refresh } => {
                if !auth.is_authenticated() {
                    bail!("not logged in, run `ellp login` first");
                }
                let user = match auth.cached_user() {
                    Some(user) if !refresh => user,
                    _ => auth.me().await?,
                };
                if app.json {
                    display::json(&user)
                } else {
                    display::user(&user);
                    Ok(())
                }
            }
            Commands::Volunteers(command) => command.execute(app).await,
            Commands::Workshops(command) => command.execute(app).await,
            Commands::Documents(command) => command.execute(app).await,
        }
    }
}

impl VolunteerCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        let volunteers = app.client.volunteers();
        match self {
            VolunteerCommands::List { status, paging } => {
                let filter = VolunteerFilter {
                    is_active: status.map(StatusFilter::is_active),
                    ..Default::default()
                };
                let all = volunteers.list(&filter).await?;
                let page = page_of(all, &paging, app, |v| v.name.as_str());
                if app.json {
                    return display::json(&page);
                }
                display::volunteer_rows(&page.items);
                display::page_footer(&page);
                Ok(())
            }
            VolunteerCommands::Get { id } => {
                let volunteer = volunteers.get_by_id(&id).await?;
                show_volunteer(app, &volunteer)
            }
            VolunteerCommands::Create {
                name,
                email,
                phone,
                academic,
                course,
                ra,
                entry_date,
            } => {
                let request = CreateVolunteerRequest {
                    name,
                    email,
                    phone,
                    is_academic: academic,
                    course,
                    ra,
                    entry_date: start_of_day(entry_date.unwrap_or_else(today)),
                };
                let volunteer = volunteers.create(&request).await?;
                show_volunteer(app, &volunteer)
            }
            VolunteerCommands::Update {
                id,
                name,
                email,
                phone,
                academic,
                course,
                ra,
                entry_date,
            } => {
                let request = UpdateVolunteerRequest {
                    name,
                    email,
                    phone,
                    is_academic: academic,
                    course,
                    ra,
                    entry_date: entry_date.map(start_of_day),
                };
                if request.is_empty() {
                    bail!("nothing to update, pass at least one field");
                }
                let volunteer = volunteers.update(&id, &request).await?;
                show_volunteer(app, &volunteer)
            }
            VolunteerCommands::Delete { id } => {
                volunteers.delete(&id).await?;
                println!("Volunteer {id} deleted");
                Ok(())
            }
            VolunteerCommands::Inactivate { id, exit_date } => {
                let exit_date = start_of_day(exit_date.unwrap_or_else(today));
                let volunteer = volunteers.inactivate(&id, exit_date).await?;
                show_volunteer(app, &volunteer)
            }
            VolunteerCommands::AddWorkshop {
                volunteer_id,
                workshop_id,
            } => {
                volunteers.add_workshop(&volunteer_id, &workshop_id).await?;
                println!("Workshop {workshop_id} added to volunteer {volunteer_id}");
                Ok(())
            }
            VolunteerCommands::RemoveWorkshop {
                volunteer_id,
                workshop_id,
            } => {
                volunteers
                    .remove_workshop(&volunteer_id, &workshop_id)
                    .await?;
                println!("Workshop {workshop_id} removed from volunteer {volunteer_id}");
                Ok(())
            }
            VolunteerCommands::Workshops { volunteer_id } => {
                let workshops = volunteers.workshops(&volunteer_id).await?;
                if app.json {
                    return display::json(&workshops);
                }
                display::workshop_rows(&workshops);
                Ok(())
            }
        }
    }
}

impl WorkshopCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        let workshops = app.client.workshops();
        match self {
            WorkshopCommands::List {
                month,
                year,
                paging,
            } => {
                let filter = WorkshopFilter {
                    month,
                    year,
                    ..Default::default()
                };
                let all = workshops.list(&filter).await?;
                let page = page_of(all, &paging, app, |w| w.name.as_str());
                if app.json {
                    return display::json(&page);
                }
                display::workshop_rows(&page.items);
                display::page_footer(&page);
                Ok(())
            }
            WorkshopCommands::Get { id } => {
                let workshop = workshops.get_by_id(&id).await?;
                show_workshop(app, &workshop)
            }
            WorkshopCommands::Create {
                name,
                date,
                description,
            } => {
                let workshop = workshops
                    .create(&CreateWorkshopRequest {
                        name,
                        date,
                        description,
                    })
                    .await?;
                show_workshop(app, &workshop)
            }
            WorkshopCommands::Update {
                id,
                name,
                date,
                description,
            } => {
                let request = UpdateWorkshopRequest {
                    name,
                    date,
                    description,
                };
                if request.is_empty() {
                    bail!("nothing to update, pass at least one field");
                }
                let workshop = workshops.update(&id, &request).await?;
                show_workshop(app, &workshop)
            }
            WorkshopCommands::Delete { id } => {
                workshops.delete(&id).await?;
                println!("Workshop {id} deleted");
                Ok(())
            }
            WorkshopCommands::AddVolunteer {
                workshop_id,
                volunteer_id,
            } => {
                workshops.add_volunteer(&workshop_id, &volunteer_id).await?;
                println!("Volunteer {volunteer_id} added to workshop {workshop_id}");
                Ok(())
            }
            WorkshopCommands::RemoveVolunteer {
                workshop_id,
                volunteer_id,
            } => {
                workshops
                    .remove_volunteer(&workshop_id, &volunteer_id)
                    .await?;
                println!("Volunteer {volunteer_id} removed from workshop {workshop_id}");
                Ok(())
            }
        }
    }
}

impl DocumentCommands {
    pub async fn execute(self, app: &App) -> Result<()> {
        let now = Local::now().naive_local();
        let volunteers = app.client.volunteers();
        match self {
            DocumentCommands::Certificate {
                volunteer_id,
                output,
            } => {
                let volunteer = volunteers.get_by_id(&volunteer_id).await?;
                let document = certificate(&volunteer, now)?;
                save(app, &document, output.as_deref())
            }
            DocumentCommands::Report {
                volunteer_id,
                ids_only,
                output,
            } => {
                let volunteer = volunteers.get_by_id(&volunteer_id).await?;
                let document = if ids_only {
                    participation_report(&volunteer, now)?
                } else {
                    let workshops = volunteers.workshops(&volunteer_id).await?;
                    participation_report_with_workshops(&volunteer, &workshops, now)?
                };
                save(app, &document, output.as_deref())
            }
            DocumentCommands::Batch { status, output } => {
                let filter = VolunteerFilter {
                    is_active: status.map(StatusFilter::is_active),
                    ..Default::default()
                };
                let all = volunteers.list(&filter).await?;
                let document = batch_report(&all, now)?;
                save(app, &document, output.as_deref())
            }
        }
    }
}

fn page_of<T>(
    items: Vec<T>,
    paging: &PageArgs,
    app: &App,
    name: impl Fn(&T) -> &str,
) -> ellp_core::Page<T> {
    let term = paging.search.as_deref().unwrap_or_default();
    let matching: Vec<T> = items
        .into_iter()
        .filter(|item| matches_search(name(item), term))
        .collect();
    let per_page = paging.per_page.unwrap_or(app.config.listing.per_page);
    paginate(matching, paging.page, per_page)
}

fn show_volunteer(app: &App, volunteer: &Volunteer) -> Result<()> {
    if app.json {
        return display::json(volunteer);
    }
    display::volunteer(volunteer);
    Ok(())
}

fn show_workshop(app: &App, workshop: &Workshop) -> Result<()> {
    if app.json {
        return display::json(workshop);
    }
    display::workshop(workshop);
    Ok(())
}

fn save(app: &App, document: &Document, output: Option<&Path>) -> Result<()> {
    let dir = output.unwrap_or(app.config.output.dir.as_path());
    let path = document
        .save_to(dir)
        .with_context(|| format!("could not save {}", document.file_name))?;
    println!("Saved {}", path.display());
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
