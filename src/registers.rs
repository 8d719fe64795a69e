/*!
    register layout of the STM32F1 USART peripheral

    the bitfield types are plain data and always available. The memory-mapped [Usart] backend implementing [SerialPeripheral](crate::peripheral::SerialPeripheral) requires feature `stm32`.
*/

use bilge::prelude::*;


/// status register (SR)
#[bitsize(16)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq, Default)]
pub struct Status {
    /// parity error
    pub pe: bool,
    /// framing error
    pub fe: bool,
    /// noise error
    pub ne: bool,
    /// overrun error, a received byte was lost because the previous one was not read in time
    pub ore: bool,
    /// idle line detected
    pub idle: bool,
    /// read data register not empty
    pub rxne: bool,
    /// transmission complete
    pub tc: bool,
    /// transmit data register empty
    pub txe: bool,
    /// lin break detected
    pub lbd: bool,
    /// clear to send toggled
    pub cts: bool,
    _reserved: u6,
}

/// control register 1 (CR1)
#[bitsize(16)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq, Default)]
pub struct Control1 {
    /// send break
    pub sbk: bool,
    /// receiver wakeup
    pub rwu: bool,
    /// receiver enable
    pub re: bool,
    /// transmitter enable
    pub te: bool,
    pub idleie: bool,
    pub rxneie: bool,
    pub tcie: bool,
    pub txeie: bool,
    pub peie: bool,
    /// parity selection, odd when set
    pub ps: bool,
    /// parity control enable
    pub pce: bool,
    pub wake: bool,
    /// word length, 9 bits when set
    pub m: bool,
    /// usart enable
    pub ue: bool,
    _reserved: u2,
}

impl Control1 {
    /// control value enabling the peripheral with the requested directions, all other fields at their reset value
    pub fn enabled(transmit: bool, receive: bool) -> Self {
        let mut control = Self::from(0u16);
        control.set_ue(true);
        control.set_te(transmit);
        control.set_re(receive);
        control
    }
}


#[cfg(feature = "stm32")]
pub use mapped::*;

#[cfg(feature = "stm32")]
mod mapped {
    use core::ptr::{read_volatile, write_volatile, addr_of, addr_of_mut};
    use log::*;
    use super::{Status, Control1};
    use crate::{
        config::{Config, Channel},
        peripheral::SerialPeripheral,
        };

    /// USART1 register block base address
    pub const USART1_BASE: usize = 0x4001_3800;
    /// USART2 register block base address
    pub const USART2_BASE: usize = 0x4000_4400;

    /// register block, each 16 bit register is followed by 16 reserved bits
    #[repr(C)]
    struct RegisterBlock {
        sr: u16,
        _reserved0: u16,
        dr: u16,
        _reserved1: u16,
        brr: u16,
        _reserved2: u16,
        cr1: u16,
        _reserved3: u16,
        cr2: u16,
        _reserved4: u16,
        cr3: u16,
        _reserved5: u16,
        gtpr: u16,
        _reserved6: u16,
    }

    /// memory-mapped USART peripheral of the STM32F1 family
    pub struct Usart {
        regs: *mut RegisterBlock,
    }

    impl Usart {
        /// register block base address of a channel
        pub const fn base_address(channel: Channel) -> usize {
            match channel {
                Channel::Usart1 => USART1_BASE,
                Channel::Usart2 => USART2_BASE,
            }
        }
        /**
            access the register block of the channel selected in `config`

            nothing is accessed until the handle is used, typically by [ByteTransport::new](crate::transport::ByteTransport::new) with the same config

            # Safety

            the code must run on an STM32F1 with this channel clocked, and no other handle to the same channel may be used concurrently
        */
        pub unsafe fn steal(config: &Config) -> Self {
            let base = Self::base_address(config.channel);
            debug!("using {:?} at {:#x}", config.channel, base);
            Self {regs: base as *mut RegisterBlock}
        }
        /// base address of the register block in use
        pub fn address(&self) -> usize {
            self.regs as usize
        }
        /// current status register
        pub fn status(&self) -> Status {
            // SAFETY: regs points to a live register block, guaranteed by `steal`
            Status::from(unsafe {read_volatile(addr_of!((*self.regs).sr))})
        }
        fn write_control1(&mut self, control: Control1) {
            // SAFETY: see `status`
            unsafe {write_volatile(addr_of_mut!((*self.regs).cr1), u16::from(control))}
        }
    }

    impl SerialPeripheral for Usart {
        fn configure_divisor(&mut self, divisor: u16) {
            // SAFETY: see `status`
            unsafe {write_volatile(addr_of_mut!((*self.regs).brr), divisor)}
        }
        fn reset_control_registers(&mut self) {
            // SAFETY: see `status`
            unsafe {
                write_volatile(addr_of_mut!((*self.regs).brr), 0);
                write_volatile(addr_of_mut!((*self.regs).cr1), 0);
                write_volatile(addr_of_mut!((*self.regs).cr2), 0);
                write_volatile(addr_of_mut!((*self.regs).cr3), 0);
                write_volatile(addr_of_mut!((*self.regs).gtpr), 0);
            }
        }
        fn enable(&mut self, transmit: bool, receive: bool) {
            self.write_control1(Control1::enabled(transmit, receive));
        }
        fn receive_ready(&mut self) -> bool {
            self.status().rxne()
        }
        fn transmit_ready(&mut self) -> bool {
            self.status().txe()
        }
        fn read_data(&mut self) -> u8 {
            // SAFETY: see `status`
            let data = unsafe {read_volatile(addr_of!((*self.regs).dr))};
            // only the low byte is meaningful in 8 bit mode
            data as u8
        }
        fn write_data(&mut self, data: u8) {
            // SAFETY: see `status`
            unsafe {write_volatile(addr_of_mut!((*self.regs).dr), u16::from(data))}
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_flags_position() {
        assert!(Status::from(0x0020u16).rxne());
        assert!(! Status::from(0x0020u16).txe());
        assert!(Status::from(0x0080u16).txe());
        assert!(Status::from(0x00c0u16).tc());
    }

    #[test]
    fn control_enable_bits() {
        assert_eq!(u16::from(Control1::enabled(true, true)), 0x2000 | 0x0008 | 0x0004);
        assert_eq!(u16::from(Control1::enabled(true, false)), 0x2008);
        assert_eq!(u16::from(Control1::enabled(false, false)), 0x2000);
    }

    #[cfg(feature = "stm32")]
    #[test]
    fn usart_address_follows_config() {
        use crate::config::{Config, Channel};

        // SAFETY: the handles are only inspected, no register is accessed
        let usart = unsafe {Usart::steal(&Config::default())};
        assert_eq!(usart.address(), 0x4001_3800);
        let usart = unsafe {Usart::steal(&Config::default().with_channel(Channel::Usart2))};
        assert_eq!(usart.address(), 0x4000_4400);
        assert_eq!(Usart::base_address(Channel::Usart1), USART1_BASE);
        assert_eq!(Usart::base_address(Channel::Usart2), USART2_BASE);
    }
}
