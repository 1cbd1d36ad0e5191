//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use congregate::attendance::{AttendanceStore, Service};
use congregate::auth::AuthService;
use congregate::config::Config;
use congregate::dashboard;
use congregate::donations::{Donation, DonationStore};
use congregate::events::{self, Event, EventStore};
use congregate::members::{Member, MemberStore};
use congregate::sermons::{Sermon, SermonStore};
use congregate::storage::Storage;
use congregate::types::{
    DonationStatus, DonationType, EventId, EventType, MediaType, MemberId, MemberStatus, PaymentMethod, Role,
    ServiceId, ServiceType,
};
use congregate::validation;

/// Church management: members, attendance, donations, events and sermons
#[derive(Parser)]
#[command(name = "congregate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the data files (overrides CONGREGATE_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Member directory
    #[command(subcommand)]
    Members(MemberCommands),

    /// Service schedule
    #[command(subcommand)]
    Services(ServiceCommands),

    /// Attendance marking and statistics
    #[command(subcommand)]
    Attendance(AttendanceCommands),

    /// Donation ledger and giving report
    #[command(subcommand)]
    Donations(DonationCommands),

    /// Event calendar
    #[command(subcommand)]
    Events(EventCommands),

    /// Sermon archive
    #[command(subcommand)]
    Sermons(SermonCommands),

    /// Accounts and sessions
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Overview across every store
    Dashboard,
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// List members
    List {
        /// Only members with this standing
        #[arg(long)]
        status: Option<MemberStatus>,
        /// Only members in this group
        #[arg(long)]
        group: Option<String>,
    },
    /// Add a member
    Add(AddMemberArgs),
    /// Remove a member
    Remove {
        /// Member id
        id: String,
    },
    /// Search by name or email
    Search {
        /// Search text
        query: String,
    },
    /// List every group in use
    Groups,
}

#[derive(Args)]
pub struct AddMemberArgs {
    /// Given name
    #[arg(long)]
    pub first: String,
    /// Family name
    #[arg(long)]
    pub last: String,
    /// Contact email
    #[arg(long)]
    pub email: Option<String>,
    /// Contact phone
    #[arg(long)]
    pub phone: Option<String>,
    /// Postal address
    #[arg(long)]
    pub address: Option<String>,
    /// Join date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub joined: Option<NaiveDate>,
    /// Membership standing
    #[arg(long, default_value = "active")]
    pub status: MemberStatus,
    /// Group membership (repeatable)
    #[arg(long = "group")]
    pub groups: Vec<String>,
}

#[derive(Subcommand)]
pub enum ServiceCommands {
    /// Schedule a service
    Add {
        /// Service date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Service type
        #[arg(long = "type", default_value = "sunday")]
        service_type: ServiceType,
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// List services, newest first
    List,
}

#[derive(Subcommand)]
pub enum AttendanceCommands {
    /// Mark a member at a service
    Mark {
        /// Service id
        #[arg(long)]
        service: String,
        /// Member id
        #[arg(long)]
        member: String,
        /// Record the member as absent
        #[arg(long)]
        absent: bool,
    },
    /// Attendance statistics
    Stats {
        /// How many recent services to show
        #[arg(long)]
        recent: Option<usize>,
    },
    /// Attendance rate for one member
    Member {
        /// Member id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum DonationCommands {
    /// Record a donation
    Add(AddDonationArgs),
    /// List donations
    List {
        /// Only donations by this member
        #[arg(long)]
        member: Option<String>,
    },
    /// Remove a donation
    Remove {
        /// Donation id
        id: String,
    },
    /// Giving report
    Summary {
        /// Report date (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = parse_date)]
        as_of: Option<NaiveDate>,
    },
}

#[derive(Args)]
pub struct AddDonationArgs {
    /// Donor member id
    #[arg(long)]
    pub member: String,
    /// Amount given
    #[arg(long)]
    pub amount: f64,
    /// Category
    #[arg(long = "type", default_value = "offering")]
    pub donation_type: DonationType,
    /// Date received (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
    /// Payment method
    #[arg(long, default_value = "cash")]
    pub method: PaymentMethod,
    /// Processing state
    #[arg(long, default_value = "completed")]
    pub status: DonationStatus,
    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// Schedule an event
    Add(AddEventArgs),
    /// List every event
    List,
    /// Events that have not started yet
    Upcoming,
    /// Events that have already started
    Past,
    /// Remove an event
    Remove {
        /// Event id
        id: String,
    },
}

#[derive(Args)]
pub struct AddEventArgs {
    /// Title
    #[arg(long)]
    pub title: String,
    /// Date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,
    /// Start time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub start: NaiveTime,
    /// End time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub end: NaiveTime,
    /// Venue
    #[arg(long)]
    pub venue: String,
    /// Category
    #[arg(long = "type", default_value = "other")]
    pub event_type: EventType,
    /// Organizer
    #[arg(long)]
    pub organizer: Option<String>,
    /// Expected head count
    #[arg(long)]
    pub capacity: Option<u32>,
    /// Description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand)]
pub enum SermonCommands {
    /// Archive a sermon
    Add(AddSermonArgs),
    /// List sermons, newest first
    List {
        /// Only this series
        #[arg(long)]
        series: Option<String>,
        /// Only this preacher
        #[arg(long)]
        preacher: Option<String>,
        /// Only sermons with this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// List every series
    Series,
}

#[derive(Args)]
pub struct AddSermonArgs {
    /// Title
    #[arg(long)]
    pub title: String,
    /// Preacher
    #[arg(long)]
    pub preacher: String,
    /// Date preached (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,
    /// Series name
    #[arg(long)]
    pub series: Option<String>,
    /// Topic tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Link to the recording
    #[arg(long)]
    pub media_url: Option<String>,
    /// Recording format
    #[arg(long, default_value = "audio")]
    pub media_type: MediaType,
    /// Running time, e.g. 42:10
    #[arg(long)]
    pub duration: Option<String>,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account (the first account is an administrator)
    Signup {
        /// Display name
        #[arg(long)]
        name: String,
        /// Login email
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long, env = "CONGREGATE_PASSWORD")]
        password: String,
    },
    /// Sign in
    Login {
        /// Login email
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long, env = "CONGREGATE_PASSWORD")]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Issue a password reset code
    Forgot {
        /// Account email
        #[arg(long)]
        email: String,
    },
    /// Set a new password with a reset code
    Reset {
        /// Account email
        #[arg(long)]
        email: String,
        /// Reset code
        #[arg(long)]
        code: String,
        /// New password
        #[arg(long, env = "CONGREGATE_PASSWORD")]
        password: String,
    },
    /// Change an account's role (administrators only)
    Role {
        /// Account email
        #[arg(long)]
        email: String,
        /// New role
        #[arg(long)]
        role: Role,
    },
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    validation::parse_date("date", s).map_err(|e| e.to_string())
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    validation::parse_time("time", s).map_err(|e| e.to_string())
}

fn today() -> NaiveDate {
    events::local_now().date()
}

/// Dispatch a parsed command.
pub fn run(command: Commands, storage: &dyn Storage, config: &Config) -> Result<()> {
    let auth = AuthService::with_otp_ttl(storage, config.otp_ttl()?);

    match command {
        Commands::Members(cmd) => members(cmd, storage, &auth),
        Commands::Services(cmd) => services(cmd, storage, &auth),
        Commands::Attendance(cmd) => attendance(cmd, storage, &auth, config),
        Commands::Donations(cmd) => donations(cmd, storage, &auth),
        Commands::Events(cmd) => event_commands(cmd, storage, &auth),
        Commands::Sermons(cmd) => sermons(cmd, storage, &auth),
        Commands::Auth(cmd) => accounts(cmd, &auth),
        Commands::Dashboard => {
            let view = dashboard::overview(storage, events::local_now())?;
            println!("Members:            {} ({} active)", view.total_members, view.active_members);
            println!("Upcoming events:    {}", view.upcoming_events);
            println!("Sermons:            {}", view.sermons);
            println!("Giving this month:  {:.2}", view.donations_this_month);
            println!("Average attendance: {}%", view.average_attendance);
            Ok(())
        }
    }
}

fn print_member(m: &Member) {
    let email = m.email.as_deref().unwrap_or("-");
    let groups = if m.groups.is_empty() { String::new() } else { format!(" [{}]", m.groups.join(", ")) };
    println!("{}  {:<28} {:<8} {}{}", m.id, m.full_name(), m.status, email, groups);
}

fn members(cmd: MemberCommands, storage: &dyn Storage, auth: &AuthService<'_>) -> Result<()> {
    let store = MemberStore::new(storage);
    match cmd {
        MemberCommands::List { status, group } => {
            let list = match (status, group) {
                (Some(status), Some(group)) => {
                    store.in_group(&group).into_iter().filter(|m| m.status == status).collect()
                }
                (Some(status), None) => store.by_status(status),
                (None, Some(group)) => store.in_group(&group),
                (None, None) => store.list(),
            };
            for m in &list {
                print_member(m);
            }
            println!("{} member(s)", list.len());
        }
        MemberCommands::Add(args) => {
            auth.require_role(Role::Staff)?;
            let mut member = Member::new(args.first, args.last, args.joined.unwrap_or_else(today));
            member.email = args.email;
            member.phone = args.phone;
            member.address = args.address;
            member.status = args.status;
            for group in args.groups {
                member.join_group(group);
            }
            let member = store.add(member)?;
            println!("Added {} ({})", member.full_name(), member.id);
        }
        MemberCommands::Remove { id } => {
            auth.require_role(Role::Staff)?;
            let member = store.remove(&MemberId::new(id))?;
            println!("Removed {}", member.full_name());
        }
        MemberCommands::Search { query } => {
            for m in &store.search(&query) {
                print_member(m);
            }
        }
        MemberCommands::Groups => {
            for group in store.groups() {
                println!("{group}");
            }
        }
    }
    Ok(())
}

fn services(cmd: ServiceCommands, storage: &dyn Storage, auth: &AuthService<'_>) -> Result<()> {
    let store = AttendanceStore::new(storage);
    match cmd {
        ServiceCommands::Add { date, service_type, name } => {
            auth.require_role(Role::Staff)?;
            let service = store.add_service(Service::new(date, service_type, name))?;
            println!("Scheduled {} on {} ({})", service.name, service.date, service.id);
        }
        ServiceCommands::List => {
            let mut list = store.services();
            list.sort_by(|a, b| b.date.cmp(&a.date));
            for s in &list {
                println!("{}  {}  {:<9} {}", s.id, s.date, s.service_type, s.name);
            }
        }
    }
    Ok(())
}

fn attendance(cmd: AttendanceCommands, storage: &dyn Storage, auth: &AuthService<'_>, config: &Config) -> Result<()> {
    let store = AttendanceStore::new(storage);
    match cmd {
        AttendanceCommands::Mark { service, member, absent } => {
            auth.require_role(Role::Staff)?;
            let service = store.service(&ServiceId::new(service))?;
            let record = store.mark(&service, &MemberId::new(member), !absent)?;
            let state = if record.present { "present" } else { "absent" };
            println!("Marked {} {state} at {} ({})", record.member_id, service.name, service.date);
        }
        AttendanceCommands::Stats { recent } => {
            let member_count = MemberStore::new(storage).count();
            let stats = store.stats(member_count, recent.unwrap_or(config.recent_services));
            println!("Services:           {}", stats.total_services);
            println!("Present marks:      {}", stats.present_count);
            println!("Average attendance: {}%", stats.average_attendance);
            println!();
            for s in &stats.recent {
                println!(
                    "  {}  {:<9} {:<24} {:>3} present / {:>3} recorded  {:>3}%",
                    s.date, s.service_type, s.name, s.present, s.recorded, s.rate
                );
            }
        }
        AttendanceCommands::Member { id } => {
            let id = MemberId::new(id);
            let records = store.records_for_member(&id);
            println!("{id}: {}% over {} record(s)", store.member_rate(&id), records.len());
        }
    }
    Ok(())
}

fn print_donation(d: &Donation) {
    println!(
        "{}  {}  {:>10.2}  {:<9} {:<7} {:<9} {}",
        d.id, d.date, d.amount, d.donation_type, d.method, d.status, d.member_id
    );
}

fn donations(cmd: DonationCommands, storage: &dyn Storage, auth: &AuthService<'_>) -> Result<()> {
    auth.require_role(Role::Staff)?;
    let store = DonationStore::new(storage);
    match cmd {
        DonationCommands::Add(args) => {
            let mut donation = Donation::new(
                MemberId::new(args.member),
                args.amount,
                args.donation_type,
                args.date.unwrap_or_else(today),
                args.method,
            );
            donation.status = args.status;
            donation.notes = args.notes;
            let donation = store.add(donation)?;
            println!("Recorded {:.2} {} ({})", donation.amount, donation.donation_type, donation.id);
        }
        DonationCommands::List { member } => {
            let list = match member {
                Some(member) => store.for_member(&MemberId::new(member)),
                None => store.list(),
            };
            for d in &list {
                print_donation(d);
            }
        }
        DonationCommands::Remove { id } => {
            let removed = store.remove(&congregate::types::DonationId::new(id))?;
            println!("Removed donation {}", removed.id);
        }
        DonationCommands::Summary { as_of } => {
            let summary = store.summary(as_of.unwrap_or_else(today))?;
            println!("Total: {:.2} over {} donation(s)", summary.grand_total, summary.count);
            println!("\nBy type:");
            for t in &summary.by_type {
                println!("  {:<9} {:>10.2}", t.donation_type, t.total);
            }
            println!("\nMonthly:");
            for m in &summary.monthly {
                println!("  {:<9} {:>10.2}", m.label, m.total);
            }
            println!("\nTop donors:");
            for (rank, donor) in summary.top_donors.iter().enumerate() {
                println!("  {}. {:<36} {:>10.2} ({} gifts)", rank + 1, donor.member_id, donor.total, donor.count);
            }
        }
    }
    Ok(())
}

fn print_event(e: &Event) {
    println!(
        "{}  {} {}-{}  {:<10} {} @ {}",
        e.id,
        e.date,
        e.start_time.format("%H:%M"),
        e.end_time.format("%H:%M"),
        e.event_type,
        e.title,
        e.venue
    );
}

fn event_commands(cmd: EventCommands, storage: &dyn Storage, auth: &AuthService<'_>) -> Result<()> {
    let store = EventStore::new(storage);
    match cmd {
        EventCommands::Add(args) => {
            auth.require_role(Role::Staff)?;
            let mut event = Event::new(args.title, args.date, args.start, args.end, args.venue);
            event.event_type = args.event_type;
            event.organizer = args.organizer;
            event.capacity = args.capacity;
            event.description = args.description;
            let event = store.add(event)?;
            println!("Scheduled {} ({})", event.title, event.id);
        }
        EventCommands::List => store.list().iter().for_each(print_event),
        EventCommands::Upcoming => store.upcoming(events::local_now()).iter().for_each(print_event),
        EventCommands::Past => store.past(events::local_now()).iter().for_each(print_event),
        EventCommands::Remove { id } => {
            auth.require_role(Role::Staff)?;
            let event = store.remove(&EventId::new(id))?;
            println!("Removed {}", event.title);
        }
    }
    Ok(())
}

fn sermons(cmd: SermonCommands, storage: &dyn Storage, auth: &AuthService<'_>) -> Result<()> {
    let store = SermonStore::new(storage);
    match cmd {
        SermonCommands::Add(args) => {
            auth.require_role(Role::Staff)?;
            let mut sermon = Sermon::new(args.title, args.preacher, args.date);
            sermon.series = args.series;
            sermon.tags = args.tags;
            sermon.media_url = args.media_url;
            sermon.media_type = args.media_type;
            sermon.duration = args.duration;
            let sermon = store.add(sermon)?;
            println!("Archived {} ({})", sermon.title, sermon.id);
        }
        SermonCommands::List { series, preacher, tag } => {
            let list = if let Some(series) = series {
                store.by_series(&series)
            } else if let Some(preacher) = preacher {
                store.by_preacher(&preacher)
            } else if let Some(tag) = tag {
                store.by_tag(&tag)
            } else {
                store.list()
            };
            for s in &list {
                let series = s.series.as_deref().map(|n| format!(" [{n}]")).unwrap_or_default();
                println!("{}  {}  {} - {}{}", s.id, s.date, s.title, s.preacher, series);
            }
        }
        SermonCommands::Series => {
            for series in store.series() {
                println!("{series}");
            }
        }
    }
    Ok(())
}

fn accounts(cmd: AuthCommands, auth: &AuthService<'_>) -> Result<()> {
    match cmd {
        AuthCommands::Signup { name, email, password } => {
            let user = auth.signup(&name, &email, &password)?;
            println!("Created {} account for {}", user.role, user.email);
        }
        AuthCommands::Login { email, password } => {
            let session = auth.login(&email, &password)?;
            println!("Signed in as {} ({})", session.name, session.role);
        }
        AuthCommands::Logout => {
            auth.logout()?;
            println!("Signed out");
        }
        AuthCommands::Whoami => match auth.current_user() {
            Some(session) => println!("{} <{}> ({})", session.name, session.email, session.role),
            None => println!("Not signed in"),
        },
        AuthCommands::Forgot { email } => {
            let code = auth.forgot_password(&email)?;
            // No mail transport; the code is shown to the operator
            println!("Reset code for {email}: {code}");
        }
        AuthCommands::Reset { email, code, password } => {
            auth.reset_password(&email, &code, &password)
                .with_context(|| format!("Could not reset password for {email}"))?;
            println!("Password updated");
        }
        AuthCommands::Role { email, role } => {
            let user = auth.set_role(&email, role)?;
            println!("{} is now {}", user.email, user.role);
        }
    }
    Ok(())
}
