use crate::cli::Command;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use whopays_application::GroupService;
use whopays_domain::model::GroupId;
use whopays_presentation::SummaryPresenter;

/// Runs one CLI command and returns what should be printed on stdout.
pub fn execute(command: Command, service: &GroupService<'_>) -> Result<String> {
    let presenter = SummaryPresenter::new(service.engine().calculator().context());

    match command {
        Command::CreateGroup(args) => {
            let group = service
                .create_group(&args.name, args.members)
                .context("could not create group")?;
            Ok(format!(
                "Created group {} \"{}\" with {} members\n",
                group.id,
                group.name,
                group.members.len()
            ))
        }
        Command::AddExpense(args) => {
            let expense = service
                .add_expense(
                    GroupId(args.group),
                    args.amount,
                    &args.description,
                    &args.sender,
                )
                .context("could not add expense")?;
            Ok(format!(
                "Added expense {} to group {}: {} paid {}\n",
                expense.id, expense.group_id, expense.sender, expense.amount
            ))
        }
        Command::Summary(args) => {
            let summary = service.group_summary(GroupId(args.group))?;
            if args.json {
                let mut out = serde_json::to_string_pretty(&summary)?;
                out.push('\n');
                Ok(out)
            } else {
                Ok(presenter.render(&summary))
            }
        }
        Command::Total(args) => {
            let group_id = GroupId(args.group);
            let attributable = service.group_summary(group_id)?.total;
            let recorded = service.total_expenses(group_id)?;

            let mut out = format!("Total spent: {}\n", presenter.format_amount(attributable));
            if recorded != attributable {
                let _ = writeln!(
                    &mut out,
                    "Recorded: {} ({} paid by non-members)",
                    presenter.format_amount(recorded),
                    presenter.format_amount(recorded - attributable)
                );
            }
            Ok(out)
        }
        Command::Balance(args) => {
            let balance = service.member_balance(GroupId(args.group), &args.member)?;
            Ok(format!("{}: {}\n", args.member, presenter.format_amount(balance)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AddExpenseArgs, BalanceArgs, CreateGroupArgs, GroupArg, SummaryArgs};
    use rstest::{fixture, rstest};
    use whopays_application::SettlementOptions;
    use whopays_domain::{Money, MoneyContext, RoundingMode, TieBreakPolicy};
    use whopays_infrastructure::InMemoryGroupStore;

    #[fixture]
    fn store() -> InMemoryGroupStore {
        InMemoryGroupStore::new()
    }

    fn run(service: &GroupService<'_>, command: Command) -> String {
        execute(command, service).expect("command succeeds")
    }

    fn add(service: &GroupService<'_>, sender: &str, amount: i64) {
        run(
            service,
            Command::AddExpense(AddExpenseArgs {
                group: 1,
                amount: Money::from_i64(amount),
                description: "item".to_owned(),
                sender: sender.to_owned(),
            }),
        );
    }

    #[rstest]
    fn end_to_end_flow(store: InMemoryGroupStore) {
        let service = GroupService::new(&store, SettlementOptions::default());

        let created = run(
            &service,
            Command::CreateGroup(CreateGroupArgs {
                name: "ST".to_owned(),
                members: vec!["user2".into(), "user4".into(), "user3".into(), "user5".into()],
            }),
        );
        assert_eq!(created, "Created group 1 \"ST\" with 4 members\n");

        for (sender, amount) in [("user2", 100), ("user4", 50), ("user3", 30), ("user5", 20)] {
            add(&service, sender, amount);
        }

        let json = run(
            &service,
            Command::Summary(SummaryArgs {
                group: 1,
                json: true,
            }),
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], serde_json::json!(200.0));
        assert_eq!(value["next_payer"], serde_json::json!("user5"));
        assert_eq!(value["balances"][2], serde_json::json!({ "nombre": "user3", "balance": -20.0 }));

        let text = run(&service, Command::Summary(SummaryArgs { group: 1, json: false }));
        assert!(text.contains("Next payer: user5 (owes 30.00)"));
        assert!(text.contains("item         user3     30.00"));

        let total = run(&service, Command::Total(GroupArg { group: 1 }));
        assert_eq!(total, "Total spent: 200.00\n");

        let balance = run(
            &service,
            Command::Balance(BalanceArgs {
                group: 1,
                member: "user3".to_owned(),
            }),
        );
        assert_eq!(balance, "user3: -20.00\n");
    }

    #[rstest]
    fn rejected_expense_is_an_error(store: InMemoryGroupStore) {
        let service = GroupService::new(&store, SettlementOptions::default());
        run(
            &service,
            Command::CreateGroup(CreateGroupArgs {
                name: "Trip".to_owned(),
                members: vec!["ana".into()],
            }),
        );

        let result = execute(
            Command::AddExpense(AddExpenseArgs {
                group: 1,
                amount: Money::from_i64(-3),
                description: "Refund".to_owned(),
                sender: "ana".to_owned(),
            }),
            &service,
        );
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("greater than zero"));
    }

    #[rstest]
    fn unknown_group_summary_fails(store: InMemoryGroupStore) {
        let service = GroupService::new(&store, SettlementOptions::default());
        let result = execute(Command::Summary(SummaryArgs { group: 9, json: false }), &service);
        assert!(result.is_err());
    }

    #[rstest]
    fn amounts_are_printed_at_the_configured_scale(store: InMemoryGroupStore) {
        let options = SettlementOptions {
            money: MoneyContext::try_new(4, RoundingMode::HalfUp).unwrap(),
            tie_break: TieBreakPolicy::Stable,
        };
        let service = GroupService::new(&store, options);
        run(
            &service,
            Command::CreateGroup(CreateGroupArgs {
                name: "Thirds".to_owned(),
                members: vec!["a".into(), "b".into(), "c".into()],
            }),
        );
        add(&service, "a", 10);

        let balance = run(
            &service,
            Command::Balance(BalanceArgs {
                group: 1,
                member: "b".to_owned(),
            }),
        );
        assert_eq!(balance, "b: -3.3333\n");

        let total = run(&service, Command::Total(GroupArg { group: 1 }));
        assert_eq!(total, "Total spent: 10.0000\n");

        let text = run(&service, Command::Summary(SummaryArgs { group: 1, json: false }));
        assert!(text.contains("+6.6667"));
    }
}
