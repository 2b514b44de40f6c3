use crate::sync::config::Protocol;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for schooldesk
/// CLI application to keep school administration records in SQLite
#[derive(Parser)]
#[command(
    name = "schooldesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "School administration records (students, attendance, materials, menus) on SQLite, with encryption, backups and sync",
    long_about = None
)]
pub struct Cli {
    /// Override the data directory (useful for tests or a second school)
    #[arg(global = true, long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<String>,

    /// Database password when encryption is enabled
    #[arg(
        global = true,
        long = "password",
        env = "SCHOOLDESK_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(global = true, long = "yes", short = 'y')]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the data directory, configuration and database
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Only show the last N rows")]
        limit: Option<usize>,
    },

    /// Centers (schools or sites)
    #[command(subcommand)]
    Center(CenterCmd),

    /// Classrooms, optionally attached to a center
    #[command(subcommand)]
    Classroom(ClassroomCmd),

    /// Student records
    #[command(subcommand)]
    Student(StudentCmd),

    /// Daily attendance
    #[command(subcommand)]
    Attendance(AttendanceCmd),

    /// Inventory materials and low-stock list
    #[command(subcommand)]
    Material(MaterialCmd),

    /// Cafeteria menu
    #[command(subcommand)]
    Menu(MenuCmd),

    /// Permission slips and their responses
    #[command(subcommand)]
    Permission(PermissionCmd),

    /// Messages to families
    #[command(subcommand)]
    Message(MessageCmd),

    /// Printable notes to families
    #[command(subcommand)]
    Note(NoteCmd),

    /// Office documents stored in the data directory
    #[command(subcommand)]
    Document(DocumentCmd),

    /// Printable reports
    #[command(subcommand)]
    Report(ReportCmd),

    /// Manual zip archives and rotated startup backups
    #[command(subcommand)]
    Backup(BackupCmd),

    /// Database encryption at rest
    #[command(subcommand)]
    Crypt(CryptCmd),

    /// Snapshot synchronization
    #[command(subcommand)]
    Sync(SyncCmd),
}

#[derive(Subcommand)]
pub enum CenterCmd {
    /// Add a center
    Add {
        name: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List centers
    List,
    /// Edit a center; only the given fields change
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a center (refused while classrooms or students use it)
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ClassroomCmd {
    /// Add a classroom
    Add {
        name: String,
        #[arg(long, help = "Center id")]
        center: Option<i64>,
        #[arg(long)]
        capacity: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List classrooms
    List {
        #[arg(long, help = "Only classrooms of this center id")]
        center: Option<i64>,
    },
    /// Edit a classroom; only the given fields change
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, help = "Center id (0 detaches the classroom)")]
        center: Option<i64>,
        #[arg(long)]
        capacity: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a classroom (refused while students use it)
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum StudentCmd {
    /// Add a student
    Add {
        name: String,
        surname: String,
        #[arg(long = "birth", help = "Birth date (YYYY-MM-DD)")]
        birth_date: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long = "email", help = "Family e-mail")]
        family_email: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, help = "Center id")]
        center: Option<i64>,
        #[arg(long, help = "Classroom id")]
        classroom: Option<i64>,
        #[arg(long, help = "Store the student as inactive")]
        inactive: bool,
    },
    /// List students
    List {
        #[arg(long)]
        center: Option<i64>,
        #[arg(long)]
        classroom: Option<i64>,
        #[arg(long, help = "Include inactive students")]
        all: bool,
        #[arg(long, help = "Match name or surname")]
        search: Option<String>,
    },
    /// Show every field of one student
    Show { id: i64 },
    /// Edit a student; only the given fields change
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long = "birth")]
        birth_date: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long = "email")]
        family_email: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, help = "Center id (0 clears it)")]
        center: Option<i64>,
        #[arg(long, help = "Classroom id (0 clears it)")]
        classroom: Option<i64>,
        #[arg(long, help = "Set the active flag (true/false)")]
        active: Option<bool>,
    },
    /// Delete a student with its attendance, permissions and messages
    Delete { id: i64 },
    /// Export students to CSV
    Export {
        #[arg(long, value_name = "FILE")]
        file: String,
        #[arg(long)]
        center: Option<i64>,
        #[arg(long)]
        classroom: Option<i64>,
        #[arg(long, help = "Include inactive students")]
        all: bool,
        #[arg(long, short = 'f', help = "Overwrite the output file")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum AttendanceCmd {
    /// Record attendance for one student
    Add {
        #[arg(help = "Student id")]
        student: i64,
        #[arg(long, help = "Date (YYYY-MM-DD, today, yesterday); default today")]
        date: Option<String>,
        #[arg(long, default_value = "Presente", help = "Presente, Ausente, Tardanza, Permiso or free text")]
        status: String,
        #[arg(long = "in", help = "Check-in time (HH:MM)")]
        check_in: Option<String>,
        #[arg(long = "out", help = "Check-out time (HH:MM)")]
        check_out: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List attendance records
    List {
        #[arg(long, help = "Only this date; default today")]
        date: Option<String>,
        #[arg(long, help = "All dates")]
        all: bool,
        #[arg(long, help = "Student id")]
        student: Option<i64>,
        #[arg(long)]
        center: Option<i64>,
        #[arg(long)]
        classroom: Option<i64>,
    },
    /// Edit a record; only the given fields change
    Edit {
        id: i64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long = "in")]
        check_in: Option<String>,
        #[arg(long = "out")]
        check_out: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a record
    Delete { id: i64 },
    /// Mark every active student without a record as present
    Checkin {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        center: Option<i64>,
        #[arg(long)]
        classroom: Option<i64>,
        #[arg(long = "time", help = "Check-in time (HH:MM); default now")]
        time: Option<String>,
    },
    /// Export the records of one date to CSV
    Export {
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_name = "FILE")]
        file: String,
        #[arg(long)]
        center: Option<i64>,
        #[arg(long)]
        classroom: Option<i64>,
        #[arg(long, short = 'f', help = "Overwrite the output file")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum MaterialCmd {
    /// Add a material
    Add {
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 0)]
        quantity: i64,
        #[arg(long, default_value_t = 0)]
        minimum: i64,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List materials
    List {
        #[arg(long, help = "Only materials at or below their minimum")]
        low: bool,
    },
    /// Edit a material; only the given fields change
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        minimum: Option<i64>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Add to (or with a negative value, take from) the stock
    Adjust {
        id: i64,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Delete a material
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum MenuCmd {
    /// Add a dish to the menu of a day
    Add {
        #[arg(help = "Date (YYYY-MM-DD, today, yesterday)")]
        date: String,
        #[arg(help = "Desayuno, Almuerzo, Merienda, Cena or free text")]
        meal: String,
        dish: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        allergens: Option<String>,
    },
    /// List the menu for a range of days (default: today and the next 6)
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Edit a menu item; only the given fields change
    Edit {
        id: i64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        meal: Option<String>,
        #[arg(long)]
        dish: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        allergens: Option<String>,
    },
    /// Delete a menu item
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum PermissionCmd {
    /// Record a permission request for a student
    Add {
        #[arg(help = "Student id")]
        student: i64,
        #[arg(help = "Permission type (e.g. \"Excursion\")")]
        kind: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, help = "yes, no or pending (default pending)")]
        response: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List permissions
    List {
        #[arg(long)]
        student: Option<i64>,
        #[arg(long, help = "yes, no or pending")]
        response: Option<String>,
    },
    /// Record the family's answer
    Respond {
        id: i64,
        #[arg(help = "yes, no or pending")]
        response: String,
    },
    /// Delete a permission
    Delete { id: i64 },
    /// Generate a printable sign-off sheet for a permission type
    Template {
        kind: String,
        #[arg(long)]
        center: Option<i64>,
        #[arg(long)]
        classroom: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum NoteCmd {
    /// Write a dated family note as a PDF
    Pdf {
        #[arg(long)]
        subject: String,
        #[arg(
            long,
            conflicts_with = "file",
            required_unless_present = "file",
            help = "Note text; each line is a paragraph"
        )]
        body: Option<String>,
        #[arg(long, help = "Read the note text from a file")]
        file: Option<PathBuf>,
        #[arg(long, help = "Output file (default pdfs/nota_familiar_<date>.pdf)")]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum MessageCmd {
    /// Write a message to a student's family
    Send {
        #[arg(help = "Student id")]
        student: i64,
        subject: String,
        body: String,
    },
    /// List messages
    List {
        #[arg(long)]
        student: Option<i64>,
        #[arg(long, help = "Only unread messages")]
        unread: bool,
    },
    /// Mark a message as read (or unread)
    Read {
        id: i64,
        #[arg(long, help = "Mark as unread instead")]
        unread: bool,
    },
    /// Delete a message
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum DocumentCmd {
    /// Copy a document into the store
    Import {
        #[arg(value_name = "FILE")]
        file: String,
        #[arg(long, help = "Replace a document with the same name")]
        overwrite: bool,
    },
    /// List stored documents
    List,
    /// Delete a stored document
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum ReportCmd {
    /// Low stock, menu and attendance summary of one day
    Daily {
        #[arg(long)]
        date: Option<String>,
        #[arg(long, help = "Center name")]
        center: Option<String>,
        #[arg(long, help = "Classroom name")]
        classroom: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BackupCmd {
    /// Zip the database and documents into backups/
    Create,
    /// List manual archives
    List,
    /// Overwrite the current data with an archive
    Restore { name: String },
    /// Copy an archive out of the data directory
    Export {
        name: String,
        #[arg(value_name = "DEST")]
        dest: String,
    },
    /// Copy an external archive into backups/
    Import {
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Delete an archive
    Delete { name: String },
    /// List the rotated startup backups
    Rotated,
}

#[derive(Subcommand)]
pub enum CryptCmd {
    /// Encrypt the database and require a password from now on
    Enable,
    /// Decrypt the database and stop requiring a password
    Disable,
    /// Show whether encryption is enabled
    Status,
}

#[derive(Subcommand)]
pub enum SyncCmd {
    /// Show or change the sync configuration
    Config {
        #[arg(long = "print", help = "Print the sync configuration")]
        print_config: bool,
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
        #[arg(long, value_enum)]
        protocol: Option<Protocol>,
        #[arg(long = "interval", help = "Polling interval in seconds (minimum 60)")]
        interval: Option<u64>,
        #[arg(long = "remote-path")]
        remote_path: Option<String>,
        #[arg(long = "webdav-url")]
        webdav_url: Option<String>,
        #[arg(long = "webdav-user")]
        webdav_user: Option<String>,
        #[arg(long = "webdav-password")]
        webdav_password: Option<String>,
        #[arg(long = "smb-server")]
        smb_server: Option<String>,
        #[arg(long = "smb-share")]
        smb_share: Option<String>,
        #[arg(long = "smb-mount", help = "Local mount point of the share (mounted with its credentials)")]
        smb_mount: Option<String>,
        #[arg(long = "server-url", help = "socket.io server URL")]
        server_url: Option<String>,
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Run one sync attempt now
    Now,
    /// Test the connection of the configured transport
    Test,
    /// Run the background worker until Enter is pressed
    Start,
    /// Show the configured protocol and whether sync is enabled
    Status,
}
