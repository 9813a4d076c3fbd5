use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of a PostgreSQL table
    Page {
        #[arg(long, help = "PostgreSQL connection URL")]
        url: String,

        #[arg(long, help = "Table to page through, optionally schema-qualified")]
        table: String,

        #[arg(long, allow_hyphen_values = true, help = "Sort string, e.g. -created_at,name")]
        sort: Option<String>,

        #[arg(long, help = "Return rows after this cursor")]
        after: Option<String>,

        #[arg(long, help = "Return rows before this cursor")]
        before: Option<String>,

        #[arg(long, allow_hyphen_values = true, help = "Page size")]
        limit: Option<i64>,

        #[arg(
            long,
            help = "JSON configuration file; PAGER_* environment variables are used otherwise"
        )]
        config: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the page JSON to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Print the pagination schema introspected for a table
    Describe {
        #[arg(long, help = "PostgreSQL connection URL")]
        url: String,

        #[arg(long, help = "Table to describe")]
        table: String,
    },
    Cursor {
        #[command(subcommand)]
        command: CursorCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CursorCommand {
    /// Decode a cursor token into its column/value pairs
    Decode { token: String },
    /// Encode column:value pairs into a cursor token
    Encode {
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}
