//! Person CLI commands
//!
//! Implements CLI commands for member and host management.

use clap::{Args, Subcommand};

use crate::display::{format_people_list, format_person_details};
use crate::error::TripResult;
use crate::models::{generate_person_id, Gender, Host, Member, PersonInfo, TripDate};
use crate::workspace::Workspace;

/// Person subcommands
#[derive(Subcommand)]
pub enum PersonCommands {
    /// List all people, hosts first
    List,
    /// Show a person's profile and trips
    Show {
        /// Person ID
        id: String,
    },
    /// Register a new member
    AddMember {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Member holds a driver license
        #[arg(long)]
        driver_license: bool,
        /// Interest (repeatable)
        #[arg(short, long = "interest")]
        interests: Vec<String>,
    },
    /// Register a new host
    AddHost {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Remove a person and detach them from every trip
    Remove {
        /// Person ID
        id: String,
    },
}

/// Fields shared by members and hosts
#[derive(Args)]
pub struct ProfileArgs {
    /// Full name
    name: String,
    /// Date of birth (DD/MM/YYYY)
    #[arg(short, long)]
    dob: TripDate,
    /// Gender (Male or Female)
    #[arg(short, long, default_value = "Male")]
    gender: Gender,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
    /// Emergency contact
    #[arg(long, default_value = "")]
    emergency_contact: String,
}

impl ProfileArgs {
    fn into_info(self) -> (PersonInfo, String) {
        let name = self.name.trim();
        let id = generate_person_id(name, self.dob);
        let mut info = PersonInfo::new(id, name, self.gender, self.dob);
        info.email = self.email;
        info.phone_number = self.phone;
        info.address = self.address;
        (info, self.emergency_contact)
    }
}

/// Handle a person command
pub fn handle_person_command(workspace: &mut Workspace, cmd: PersonCommands) -> TripResult<()> {
    match cmd {
        PersonCommands::List => {
            let output = format_people_list(workspace.people().all_people());
            println!("{}", output.trim_end());
        }

        PersonCommands::Show { id } => {
            let person = workspace.person_service().get(&id)?;
            print!("{}", format_person_details(&person, workspace.settings()));
        }

        PersonCommands::AddMember {
            profile,
            driver_license,
            interests,
        } => {
            let (info, emergency_contact) = profile.into_info();
            let mut member = Member::new(info);
            member.emergency_contact = emergency_contact;
            member.has_driver_license = driver_license;
            for interest in interests {
                member.add_interest(interest);
            }

            let member = workspace.register_member(member)?;
            println!("Added member: {} ({})", member.full_name(), member.id());
        }

        PersonCommands::AddHost { profile } => {
            let (info, emergency_contact) = profile.into_info();
            let mut host = Host::new(info);
            host.emergency_contact = emergency_contact;

            let host = workspace.register_host(host)?;
            println!("Added host: {} ({})", host.full_name(), host.id());
        }

        PersonCommands::Remove { id } => {
            workspace.trip_service().remove_person(&id)?;
            println!("Removed person: {}", id);
        }
    }

    Ok(())
}
