#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt_rtt as _;
use embedded_hal::digital::InputPin;
use embedded_hal_bus::spi::ExclusiveDevice;
use hal::prelude::*;
use panic_probe as _;
use simple_network::{EtherType, MacAddress, SimpleNetwork};
use stm32f4xx_hal::{self as hal, hal_02::spi::MODE_0, rcc::Config, spi::Spi};

use qca7000::{LinkConfig, QcaLink};

const TX_QUEUE_DEPTH: usize = 4;
const RX_QUEUE_DEPTH: usize = 4;

#[entry]
fn main() -> ! {
    let cp = cortex_m::peripheral::Peripherals::take().unwrap();
    let dp = hal::pac::Peripherals::take().unwrap();

    let mut rcc = dp.RCC.freeze(Config::hsi().sysclk(16.MHz()));

    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);
    let gpiod = dp.GPIOD.split(&mut rcc);

    let sck = gpioa.pa5.into_alternate();
    let miso = gpioa.pa6.into_alternate();
    let mosi = gpioa.pa7.into_alternate();

    // QCA7000 control pins
    let mut cs = gpiob.pb1.into_push_pull_output();
    let reset = gpiob.pb0.into_push_pull_output();
    let mut irq = gpioa.pa1.into_pull_up_input();

    let mut orange_led = gpiod.pd13.into_push_pull_output();
    let mut blue_led = gpiod.pd15.into_push_pull_output();

    let mut spi = Spi::new(
        dp.SPI1,
        (Some(sck), Some(miso), Some(mosi)),
        MODE_0,
        8.MHz(),
        &mut rcc,
    );

    let dly = cp.SYST.delay(&rcc.clocks);
    let dev = ExclusiveDevice::new(&mut spi, &mut cs, dly).expect("set up SpiDevice");

    let mut link: QcaLink<_, _, TX_QUEUE_DEPTH, RX_QUEUE_DEPTH> =
        QcaLink::new(dev, reset, LinkConfig::default());

    let mut delay = dp.TIM2.delay_us(&mut rcc);

    // This board wires the modem's IRQ line to a plain GPIO input rather
    // than an EXTI interrupt; the superloop below polls it each iteration
    // and forwards it into the link the same way a real ISR would by
    // calling `on_irq()`.
    loop {
        if irq.is_low().unwrap_or(false) {
            link.on_irq();
        }

        match link.poll(&mut delay) {
            Ok(()) => orange_led.set_low(),
            Err(_) => orange_led.set_high(),
        }

        if link.sync_state() == qca7000::SyncState::Ready {
            let mut buf = [0u8; 1522];
            if let Ok(n) = link.receive(&mut buf)
                && n > 0
            {
                blue_led.set_high();
                report_frame(&buf[..n]);
                blue_led.set_low();
            }
        }
    }
}

fn report_frame(frame: &[u8]) {
    if frame.len() < 14 {
        defmt::warn!("short frame: {} bytes", frame.len());
        return;
    }
    let dst = MacAddress(frame[0..6].try_into().unwrap());
    let src = MacAddress(frame[6..12].try_into().unwrap());
    let ether_type = EtherType::from_be_bytes(frame[12..14].try_into().unwrap());
    defmt::info!(
        "frame dst={:#x} src={:#x} ethertype={:#x} payload={} bytes",
        dst.octets(),
        src.octets(),
        ether_type.as_u16(),
        frame.len() - 14
    );
}
