//! Trip CLI commands
//!
//! Implements CLI commands for trips, their members and their expenses.

use clap::{Args, Subcommand};

use crate::display::{format_expenses, format_trip_details, format_trip_list};
use crate::error::TripResult;
use crate::models::{Expense, ExpenseCategory, Money, TripDate, TripStatus};
use crate::services::{sort_trips, NewTrip, TripFilter, TripSortKey};
use crate::workspace::Workspace;

/// Trip subcommands
#[derive(Subcommand)]
pub enum TripCommands {
    /// List trips, optionally filtered and sorted
    List(ListArgs),
    /// Show a trip with its people and expenses
    Show {
        /// Trip ID
        id: String,
    },
    /// Create a new trip
    Add {
        /// Destination
        destination: String,
        /// Start date (DD/MM/YYYY)
        #[arg(short, long)]
        start: TripDate,
        /// End date (DD/MM/YYYY)
        #[arg(short, long)]
        end: TripDate,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Host ID
        #[arg(long)]
        host: Option<String>,
        /// Member ID (repeatable)
        #[arg(short, long = "member")]
        members: Vec<String>,
    },
    /// Delete a trip
    Remove {
        /// Trip ID
        id: String,
    },
    /// Change a trip's status
    Status {
        /// Trip ID
        id: String,
        /// Planned, Ongoing, Completed or Cancelled
        status: TripStatus,
    },
    /// Assign a host, or clear it when no host is given
    SetHost {
        /// Trip ID
        trip: String,
        /// Host ID
        host: Option<String>,
    },
    /// Add a member to a trip
    AddMember {
        /// Trip ID
        trip: String,
        /// Member ID
        member: String,
    },
    /// Remove a member and their expenses from a trip
    RemoveMember {
        /// Trip ID
        trip: String,
        /// Member ID
        member: String,
    },
    /// Record an expense
    AddExpense {
        /// Trip ID
        trip: String,
        /// Amount in VND (e.g. 500000 or 500.000)
        amount: Money,
        /// ID of the member who paid
        #[arg(short, long)]
        payer: String,
        /// Food, Drink, Gas, Accommodation or Others
        #[arg(short, long, default_value = "Others")]
        category: ExpenseCategory,
        /// Expense date (DD/MM/YYYY, defaults to today)
        #[arg(short, long)]
        date: Option<TripDate>,
        #[arg(short, long, default_value = "")]
        note: String,
    },
    /// Remove an expense by its index (see `trip show`)
    RemoveExpense {
        /// Trip ID
        trip: String,
        /// Expense index
        index: usize,
    },
}

/// Filter and sort options for `trip list`
#[derive(Args)]
pub struct ListArgs {
    /// Destination text to search for
    #[arg(long)]
    destination: Option<String>,
    /// Match the whole destination
    #[arg(long)]
    exact: bool,
    /// Status to include (repeatable)
    #[arg(long)]
    status: Vec<TripStatus>,
    /// Comma-separated description keywords
    #[arg(long)]
    keywords: Option<String>,
    /// Match keywords case-sensitively
    #[arg(long)]
    case_sensitive: bool,
    #[arg(long)]
    start_from: Option<TripDate>,
    #[arg(long)]
    start_to: Option<TripDate>,
    #[arg(long)]
    end_from: Option<TripDate>,
    #[arg(long)]
    end_to: Option<TripDate>,
    /// start, end, destination, id, status or description
    #[arg(long, default_value = "start")]
    sort: TripSortKey,
    /// Sort in descending order
    #[arg(long)]
    desc: bool,
}

impl ListArgs {
    fn filter(&self) -> TripFilter {
        TripFilter {
            destination: self.destination.clone(),
            exact_destination: self.exact,
            statuses: self.status.clone(),
            keywords: self.keywords.clone(),
            case_sensitive_keywords: self.case_sensitive,
            start_from: self.start_from,
            start_to: self.start_to,
            end_from: self.end_from,
            end_to: self.end_to,
        }
    }
}

/// Handle a trip command
pub fn handle_trip_command(workspace: &mut Workspace, cmd: TripCommands) -> TripResult<()> {
    match cmd {
        TripCommands::List(args) => {
            let trips = workspace.trips().all_trips();
            let mut selected = args.filter().apply(trips);
            sort_trips(&mut selected, args.sort, args.desc);

            println!("{}", format_trip_list(&selected, workspace.settings()).trim_end());
        }

        TripCommands::Show { id } => {
            let details = workspace.trip_service().details(&id)?;
            print!("{}", format_trip_details(&details, workspace.settings()));
        }

        TripCommands::Add {
            destination,
            start,
            end,
            description,
            host,
            members,
        } => {
            let trip = workspace.trip_service().create_trip(NewTrip {
                destination,
                description,
                start_date: start,
                end_date: end,
                host_id: host,
                member_ids: members,
            })?;
            println!("Created trip: {} ({})", trip.id, trip.destination());
        }

        TripCommands::Remove { id } => {
            workspace.trip_service().remove_trip(&id)?;
            println!("Removed trip: {}", id);
        }

        TripCommands::Status { id, status } => {
            workspace.trip_service().set_status(&id, status)?;
            println!("Trip {} is now {}", id, status);
        }

        TripCommands::SetHost { trip, host } => {
            workspace.trip_service().set_host(&trip, host.as_deref())?;
            match host {
                Some(host) => println!("Host of {} is now {}", trip, host),
                None => println!("Cleared host of {}", trip),
            }
        }

        TripCommands::AddMember { trip, member } => {
            if workspace.trip_service().add_member(&trip, &member)? {
                println!("Added {} to {}", member, trip);
            } else {
                println!("{} is already on {}", member, trip);
            }
        }

        TripCommands::RemoveMember { trip, member } => {
            if workspace.trip_service().remove_member(&trip, &member)? {
                println!("Removed {} from {}", member, trip);
            } else {
                println!("{} is not on {}", member, trip);
            }
        }

        TripCommands::AddExpense {
            trip,
            amount,
            payer,
            category,
            date,
            note,
        } => {
            let expense = Expense::new(
                date.unwrap_or_else(TripDate::today),
                category,
                amount,
                note,
                payer,
            );
            let mut service = workspace.trip_service();
            service.add_expense(&trip, expense)?;

            let updated = service.get(&trip)?;
            let settings = workspace.settings();
            println!("Added {} expense to {}", settings.format_money(amount), trip);
            print!("{}", format_expenses(&updated, settings));
        }

        TripCommands::RemoveExpense { trip, index } => {
            let expense = workspace.trip_service().remove_expense(&trip, index)?;
            println!("Removed expense: {}", expense);
        }
    }

    Ok(())
}
