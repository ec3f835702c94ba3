// Copyright (c) 2025 Quotedesk Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print as pretty JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print as JSON lines")
            .action(ArgAction::SetTrue),
    )
}

fn budget_arg() -> Arg {
    Arg::new("budget")
        .long("budget")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Budget id")
}

pub fn build_cli() -> Command {
    Command::new("quotedesk")
        .about("Studio management and quote pricing for architecture offices")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("client")
                .about("Client registry")
                .subcommand(
                    Command::new("add")
                        .about("Add a client")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("email").long("email"))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(Arg::new("city").long("city"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(Command::new("list").about("List clients")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a client")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("project")
                .about("Project tracking")
                .subcommand(
                    Command::new("add")
                        .about("Add a project")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("client").long("client").required(true))
                        .arg(Arg::new("area").long("area").help("Area in m²"))
                        .arg(
                            Arg::new("level")
                                .long("level")
                                .help("Delivery level: basico|executivo|premium"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List projects")))
                .subcommand(
                    Command::new("set-status")
                        .about("Change a project's status")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("status").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a project")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("collab")
                .about("Collaborator roster")
                .subcommand(
                    Command::new("add")
                        .about("Add a collaborator")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("role").long("role").required(true))
                        .arg(Arg::new("rate").long("rate").help("Hourly rate"))
                        .arg(Arg::new("hours-per-day").long("hours-per-day"))
                        .arg(
                            Arg::new("work-days")
                                .long("work-days")
                                .value_parser(value_parser!(i64))
                                .help("Working days per month"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List collaborators")))
                .subcommand(
                    Command::new("occupancy")
                        .about("Show one collaborator's monthly occupancy")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a collaborator")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("office")
                .about("Office cost ledger and overhead settings")
                .subcommand(
                    Command::new("add")
                        .about("Add a cost line")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(["fixed", "variable"]),
                        )
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("value").long("value").required(true))
                        .arg(
                            Arg::new("allow-duplicate")
                                .long("allow-duplicate")
                                .help("Keep both entries when the name already exists")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove all cost lines with a name")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(["fixed", "variable"]),
                        )
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List cost lines")))
                .subcommand(
                    Command::new("set-reserve")
                        .about("Set the technical reserve percentage")
                        .arg(Arg::new("pct").required(true)),
                )
                .subcommand(
                    Command::new("set-hours")
                        .about("Set productive hours per month")
                        .arg(Arg::new("hours").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("summary").about("Totals, reserve and hourly office cost"),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Budgets and quote pricing")
                .subcommand(
                    Command::new("new")
                        .about("Create a budget for a project")
                        .arg(Arg::new("project").long("project").required(true))
                        .arg(Arg::new("area").long("area").help("Area in m²"))
                        .arg(
                            Arg::new("level")
                                .long("level")
                                .help("Delivery level: basico|executivo|premium"),
                        ),
                )
                .subcommand(
                    Command::new("task")
                        .about("Budget task lines")
                        .subcommand(
                            Command::new("add")
                                .about("Add a task line")
                                .arg(budget_arg())
                                .arg(Arg::new("desc").long("desc").required(true))
                                .arg(Arg::new("hours").long("hours").required(true))
                                .arg(Arg::new("rate").long("rate").required(true))
                                .arg(
                                    Arg::new("collab")
                                        .long("collab")
                                        .help("Assigned collaborator name"),
                                ),
                        )
                        .subcommand(json_flags(
                            Command::new("list").about("List task lines").arg(budget_arg()),
                        )),
                )
                .subcommand(
                    Command::new("extras")
                        .about("Set non-labor extra costs")
                        .arg(budget_arg())
                        .arg(Arg::new("technical-visit").long("technical-visit"))
                        .arg(Arg::new("transport").long("transport"))
                        .arg(Arg::new("printing").long("printing"))
                        .arg(Arg::new("fees").long("fees"))
                        .arg(Arg::new("other").long("other")),
                )
                .subcommand(
                    Command::new("adjust")
                        .about("Set adjustment percentages")
                        .arg(budget_arg())
                        .arg(Arg::new("complexity").long("complexity"))
                        .arg(Arg::new("technical-reserve").long("technical-reserve"))
                        .arg(Arg::new("client-difficulty").long("client-difficulty"))
                        .arg(Arg::new("extras").long("extras"))
                        .arg(Arg::new("profit").long("profit"))
                        .arg(Arg::new("taxes").long("taxes"))
                        .arg(Arg::new("card-fee").long("card-fee"))
                        .arg(Arg::new("discount").long("discount")),
                )
                .subcommand(json_flags(
                    Command::new("calc")
                        .about("Run the pricing engine and persist the result")
                        .arg(budget_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show a budget and its last result")
                        .arg(budget_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List budgets")
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("since")
                                .long("since")
                                .help("Only budgets created on or after YYYY-MM-DD"),
                        ),
                ))
                .subcommand(
                    Command::new("set-status")
                        .about("Change a budget's status")
                        .arg(budget_arg())
                        .arg(Arg::new("status").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Studio-wide reports")
                .subcommand(json_flags(
                    Command::new("pipeline").about("Budgets by status with quoted totals"),
                ))
                .subcommand(json_flags(
                    Command::new("occupancy").about("Roster capacity vs assigned hours"),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to CSV or JSON")
                .subcommand(
                    Command::new("budgets")
                        .about("Export budgets with results")
                        .arg(Arg::new("format").long("format").required(true))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("clients")
                        .about("Export the client registry")
                        .arg(Arg::new("format").long("format").required(true))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("currency")
                .about("Display currency")
                .subcommand(
                    Command::new("set")
                        .about("Set the display currency code")
                        .arg(Arg::new("code").required(true)),
                )
                .subcommand(Command::new("show").about("Show the display currency code")),
        )
        .subcommand(
            Command::new("onboarding")
                .about("Studio setup checklist")
                .subcommand(json_flags(Command::new("list").about("List checklist tasks")))
                .subcommand(
                    Command::new("done")
                        .about("Mark a checklist task complete")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the database for inconsistencies"))
}
