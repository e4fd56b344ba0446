// src/system/bank.rs

use crate::core::command::{ArgSlot, CommandBuilder, CommandDefinition, RegistrationError};
use crate::core::completion::FnCompleter;
use crate::core::context::{CommandContext, CommandError};
use crate::core::sender::Sender;
use crate::core::session::SessionStore;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Entradas por página de `econ top`.
const TOP_PAGE_SIZE: usize = 5;

/// Un pago que espera `econ confirm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPayment {
    pub to: String,
    pub amount: i64,
}

/// Cuentas en memoria detrás del comando `econ` incorporado.
///
/// Las cuentas se indexan por el nombre del jugador en minúsculas. Los pagos
/// de al menos `confirm_over` quedan en espera por emisor hasta confirmarse o cancelarse.
#[derive(Debug)]
pub struct Bank {
    balances: RwLock<BTreeMap<String, i64>>,
    pending: SessionStore<PendingPayment>,
    confirm_over: i64,
}

impl Bank {
    pub fn new<I, S>(accounts: I, confirm_over: i64) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let balances = accounts
            .into_iter()
            .map(|(name, balance)| (name.as_ref().to_lowercase(), balance))
            .collect();
        Self {
            balances: RwLock::new(balances),
            pending: SessionStore::new(),
            confirm_over,
        }
    }

    /// Abre una cuenta con `balance` salvo que ya exista.
    pub fn open_account(&self, name: &str, balance: i64) {
        self.balances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_lowercase())
            .or_insert(balance);
    }

    pub fn balance(&self, name: &str) -> Option<i64> {
        self.balances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name.to_lowercase())
            .copied()
    }

    pub fn names(&self) -> Vec<String> {
        self.balances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn pending_for(&self, id: Uuid) -> Option<PendingPayment> {
        self.pending.peek(id, Clone::clone)
    }

    /// Descarta lo que el emisor dejó pendiente.
    pub fn disconnect(&self, id: Uuid) {
        if self.pending.end(id).is_some() {
            log::debug!("Dropped pending payment of issuer {}", id);
        }
    }

    fn transfer(&self, from: &str, to: &str, amount: i64) -> Result<(), String> {
        let mut balances = self.balances.write().unwrap_or_else(PoisonError::into_inner);
        let (from, to) = (from.to_lowercase(), to.to_lowercase());
        let available = balances.get(&from).copied().unwrap_or(0);
        if !balances.contains_key(&to) {
            return Err(format!("Account '{}' does not exist.", to));
        }
        if available < amount {
            return Err(format!(
                "Insufficient funds: you have {}, tried to send {}.",
                available, amount
            ));
        }
        balances.insert(from.clone(), available - amount);
        if let Some(target) = balances.get_mut(&to) {
            *target += amount;
        }
        log::info!("Transferred {} from '{}' to '{}'", amount, from, to);
        Ok(())
    }

    /// Construye el árbol del comando `econ` enlazado a este banco.
    pub fn command(self: &Arc<Self>) -> Result<CommandDefinition, RegistrationError> {
        let player_completer = || {
            let bank = Arc::clone(self);
            FnCompleter(move |_: &dyn Sender, _: &str| bank.names())
        };

        CommandBuilder::new("econ")
            .alias("eco")
            .description("Money and payments")
            .default_help()
            .subcommand(
                CommandBuilder::new("balance")
                    .alias("bal")
                    .description("Show a balance")
                    .arg(
                        ArgSlot::string("player")
                            .default_value("")
                            .completer(player_completer()),
                    )
                    .handler(self.bound(Bank::run_balance)),
            )
            .subcommand(
                CommandBuilder::new("pay")
                    .description("Send money to another player")
                    .permission("econ.pay")
                    .arg(ArgSlot::string("player").completer(player_completer()))
                    .arg(ArgSlot::int("amount"))
                    .handler(self.bound(Bank::run_pay)),
            )
            .subcommand(
                CommandBuilder::new("confirm")
                    .description("Send the pending payment")
                    .permission("econ.pay")
                    .handler(self.bound(Bank::run_confirm)),
            )
            .subcommand(
                CommandBuilder::new("cancel")
                    .description("Drop the pending payment")
                    .handler(self.bound(Bank::run_cancel)),
            )
            .subcommand(
                CommandBuilder::new("top")
                    .description("Richest players")
                    .arg(ArgSlot::int("page").default_value("1"))
                    .handler(self.bound(Bank::run_top)),
            )
            .build()
    }

    fn bound(
        self: &Arc<Self>,
        run: fn(&Bank, &CommandContext<'_>) -> Result<(), CommandError>,
    ) -> impl Fn(&CommandContext<'_>) -> Result<(), CommandError> + Send + Sync + 'static {
        let bank = Arc::clone(self);
        move |ctx: &CommandContext<'_>| run(&bank, ctx)
    }

    fn run_balance(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        let requested = ctx.string("player")?;
        let name = if requested.is_empty() {
            ctx.sender().name()
        } else {
            requested
        };
        let balance = self
            .balance(name)
            .ok_or_else(|| ctx.error(format!("Account '{}' does not exist.", name)))?;
        ctx.msg_fmt(format_args!("{} has {} coins.", name, balance));
        Ok(())
    }

    fn run_pay(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        let to = ctx.string("player")?;
        let amount = ctx.int("amount")?;
        let from = ctx.sender().name();
        ctx.validate(amount > 0, "The amount must be positive.")?;
        ctx.validate(!to.eq_ignore_ascii_case(from), "You cannot pay yourself.")?;
        ctx.validate(
            self.balance(to).is_some(),
            format!("Account '{}' does not exist.", to),
        )?;

        if amount >= self.confirm_over {
            let root = ctx.used_alias().split(' ').next().unwrap_or("econ");
            self.pending.start(
                ctx.sender().id(),
                PendingPayment {
                    to: to.to_string(),
                    amount,
                },
            );
            ctx.msg_fmt(format_args!(
                "Payment of {} to {} is pending. Run '{} confirm' to send it.",
                amount, to, root
            ));
            return Ok(());
        }

        self.open_account(from, 0);
        self.transfer(from, to, amount).map_err(|e| ctx.error(e))?;
        ctx.msg_fmt(format_args!("Sent {} coins to {}.", amount, to));
        Ok(())
    }

    fn run_confirm(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        let payment = self
            .pending
            .end(ctx.sender().id())
            .ok_or_else(|| ctx.error("You have no pending payment."))?;
        let from = ctx.sender().name();
        self.open_account(from, 0);
        self.transfer(from, &payment.to, payment.amount)
            .map_err(|e| ctx.error(e))?;
        ctx.msg_fmt(format_args!(
            "Sent {} coins to {}.",
            payment.amount, payment.to
        ));
        Ok(())
    }

    fn run_cancel(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        self.pending
            .end(ctx.sender().id())
            .ok_or_else(|| ctx.error("You have no pending payment."))?;
        ctx.msg("Pending payment cancelled.");
        Ok(())
    }

    fn run_top(&self, ctx: &CommandContext<'_>) -> Result<(), CommandError> {
        let page = ctx.int("page")?;
        ctx.validate(page >= 1, "Pages start at 1.")?;

        let mut ranking: Vec<(String, i64)> = self
            .balances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let skip = usize::try_from(page - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(TOP_PAGE_SIZE);
        ctx.msg_fmt(format_args!("--- Richest players (page {}) ---", page));
        for (i, (name, balance)) in ranking.iter().enumerate().skip(skip).take(TOP_PAGE_SIZE) {
            ctx.msg_fmt(format_args!("{}. {} - {}", i + 1, name, balance));
        }
        Ok(())
    }
}
